use serde::{Deserialize, Serialize};

/// A genre tag attached to a title. Ids are not guaranteed unique within a title.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: i64,
    pub title: String,
}
