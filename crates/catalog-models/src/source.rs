use serde::{Deserialize, Serialize};

/// A playable stream for a movie or episode.
///
/// Upstream gives no ordering guarantee, so callers that want "best quality
/// first" have to sort on `quality` themselves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Source {
    pub id: i64,
    pub quality: String, // Free text, e.g. "1080p"
    pub kind: String,    // Container/type label, e.g. "mp4" or "m3u8"
    pub url: String,
}
