use serde::{Deserialize, Serialize};

/// Sort key accepted by the paginated list endpoints
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Created,
    Rating,
    Imdb,
    Title,
    Year,
    Views,
}

impl SortOrder {
    /// Path segment used by the upstream index
    pub fn as_path_segment(&self) -> &'static str {
        match self {
            SortOrder::Created => "created",
            SortOrder::Rating => "rating",
            SortOrder::Imdb => "imdb",
            SortOrder::Title => "title",
            SortOrder::Year => "year",
            SortOrder::Views => "views",
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "created" => Ok(SortOrder::Created),
            "rating" => Ok(SortOrder::Rating),
            "imdb" => Ok(SortOrder::Imdb),
            "title" => Ok(SortOrder::Title),
            "year" => Ok(SortOrder::Year),
            "views" => Ok(SortOrder::Views),
            _ => Err(format!("Invalid sort order: {}. Use created, rating, imdb, title, year or views", s)),
        }
    }
}
