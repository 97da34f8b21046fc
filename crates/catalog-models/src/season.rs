use serde::{Deserialize, Serialize};
use crate::source::Source;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Season {
    pub id: i64,
    pub title: String,
    pub episodes: Vec<Episode>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Episode {
    pub id: i64,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    pub image: String,
    pub sources: Vec<Source>,
}

impl Season {
    /// Total number of playable sources across all episodes
    pub fn source_count(&self) -> usize {
        self.episodes.iter().map(|e| e.sources.len()).sum()
    }
}
