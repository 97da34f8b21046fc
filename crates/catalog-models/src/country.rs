use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Country {
    pub id: i64,
    pub title: String,
    pub image: String, // Flag or banner URL
}
