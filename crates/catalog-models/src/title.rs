use serde::{Deserialize, Serialize};
use crate::country::Country;
use crate::genre::Genre;
use crate::source::Source;

/// Placeholder used when upstream omits a title's display name
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// A catalog entry (movie or series), the unified "poster" shape of the upstream index.
///
/// `kind` decides which collections carry meaning: a series has no sources of
/// its own, those are resolved per episode through its seasons.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Title {
    pub id: i64,
    pub kind: TitleKind,
    pub title: String,
    pub description: String,
    pub year: u32, // 0 = unknown
    pub imdb: f32, // Critic score, 0.0-10.0
    pub rating: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    pub image: String,
    pub cover: String,
    pub genres: Vec<Genre>,
    pub countries: Vec<Country>,
    pub sources: Vec<Source>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TitleKind {
    Movie,
    Series,
}

impl TitleKind {
    /// Parse the upstream `type` label. The index spells series as "serie".
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "movie" | "film" => Some(TitleKind::Movie),
            "serie" | "series" | "tv" => Some(TitleKind::Series),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TitleKind::Movie => "movie",
            TitleKind::Series => "series",
        }
    }
}

impl std::fmt::Display for TitleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Title {
    pub fn is_series(&self) -> bool {
        self.kind == TitleKind::Series
    }

    /// Release year, or None when upstream did not report one
    pub fn known_year(&self) -> Option<u32> {
        (self.year > 0).then_some(self.year)
    }

    /// Sources that can be played directly. Always empty for series.
    pub fn playable_sources(&self) -> &[Source] {
        if self.is_series() {
            &[]
        } else {
            &self.sources
        }
    }
}
