use anyhow::Result;
use std::path::PathBuf;

/// Environment variable that relocates every file under one directory
pub const BASE_PATH_ENV: &str = "CINEBROWSE_BASE_PATH";

fn env_base_path() -> Option<PathBuf> {
    std::env::var_os(BASE_PATH_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Where cinebrowse keeps its config, saved titles and logs.
///
/// Nothing is created here; each writer creates its own directory on first write.
#[derive(Debug, Clone)]
pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
    log_dir: PathBuf,
}

impl PathManager {
    /// Per-user location, `<config_dir>/cinebrowse`
    pub fn new() -> Result<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("cinebrowse");

        Ok(Self::with_base(base_dir))
    }

    /// Lay out all directories under a single base (containers, tests)
    pub fn with_base(base: PathBuf) -> Self {
        Self {
            config_dir: base.clone(),
            data_dir: base.join("data"),
            log_dir: base.join("logs"),
        }
    }

    pub fn titles_dir(&self) -> PathBuf {
        self.data_dir.join("titles")
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join("cinebrowse.log")
    }
}

impl Default for PathManager {
    /// `CINEBROWSE_BASE_PATH` when set, the per-user location otherwise,
    /// `./.cinebrowse` when the platform has no config directory
    fn default() -> Self {
        if let Some(base) = env_base_path() {
            return Self::with_base(base);
        }

        Self::new().unwrap_or_else(|_| Self::with_base(PathBuf::from(".cinebrowse")))
    }
}
