use anyhow::{Context, Result};
use catalog_models::Title;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Serialize, Deserialize)]
struct SavedTitle {
    saved_at: DateTime<Utc>,
    title: Title,
}

/// Keeps a resolved title on disk between navigation steps, keyed by id.
///
/// One JSON file per title. The file format is private to this store.
pub struct TitleStore {
    dir: PathBuf,
}

impl TitleStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn title_path(&self, id: i64) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn save(&self, title: &Title) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let saved = SavedTitle {
            saved_at: Utc::now(),
            title: title.clone(),
        };
        let content = serde_json::to_string_pretty(&saved)?;

        // Atomic write: write to temp file, then rename
        let path = self.title_path(title.id);
        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, content)?;
        std::fs::rename(&temp_path, &path)?;
        debug!(id = title.id, path = %path.display(), "Saved title");
        Ok(())
    }

    /// Load a saved title. A missing entry is `Ok(None)`, a corrupt one is an error.
    pub fn load(&self, id: i64) -> Result<Option<Title>> {
        let path = self.title_path(id);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        let saved: SavedTitle = serde_json::from_str(&content)
            .with_context(|| format!("Corrupt saved title at {}", path.display()))?;
        Ok(Some(saved.title))
    }

    /// When the title was last saved, if present
    pub fn saved_at(&self, id: i64) -> Result<Option<DateTime<Utc>>> {
        let path = self.title_path(id);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        let saved: SavedTitle = serde_json::from_str(&content)?;
        Ok(Some(saved.saved_at))
    }

    /// Remove a saved title. Returns whether anything was removed.
    pub fn clear(&self, id: i64) -> Result<bool> {
        let path = self.title_path(id);
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&path)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_models::TitleKind;

    fn create_title(id: i64, name: &str) -> Title {
        Title {
            id,
            kind: TitleKind::Movie,
            title: name.to_string(),
            description: "A heist".to_string(),
            year: 1995,
            imdb: 8.3,
            rating: 4.0,
            duration: Some("2h 50min".to_string()),
            image: "https://img.example.com/heat.jpg".to_string(),
            cover: String::new(),
            genres: vec![],
            countries: vec![],
            sources: vec![],
        }
    }

    #[test]
    fn test_title_store_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = TitleStore::new(dir.path().join("titles"));

        let title = create_title(42, "Heat");
        store.save(&title).unwrap();

        let loaded = store.load(42).unwrap();
        assert_eq!(loaded, Some(title));
        assert!(store.saved_at(42).unwrap().is_some());
    }

    #[test]
    fn test_title_store_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = TitleStore::new(dir.path().to_path_buf());
        assert_eq!(store.load(1).unwrap(), None);
        assert!(!store.clear(1).unwrap());
    }

    #[test]
    fn test_title_store_overwrite_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = TitleStore::new(dir.path().to_path_buf());

        store.save(&create_title(5, "First")).unwrap();
        store.save(&create_title(5, "Second")).unwrap();
        assert_eq!(store.load(5).unwrap().unwrap().title, "Second");

        assert!(store.clear(5).unwrap());
        assert_eq!(store.load(5).unwrap(), None);
    }

    #[test]
    fn test_title_store_corrupt_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let store = TitleStore::new(dir.path().to_path_buf());
        std::fs::write(dir.path().join("9.json"), "{ not json").unwrap();
        assert!(store.load(9).is_err());
    }
}
