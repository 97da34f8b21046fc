pub mod browse;
pub mod catalog;
pub mod config;
pub mod saved;
pub mod search;

use catalog_config::{Config, PathManager, TitleStore};
use catalog_sources::CatalogClient;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use std::path::PathBuf;

pub fn path_manager() -> PathManager {
    PathManager::default()
}

pub fn resolve_config_path(explicit: Option<&PathBuf>) -> PathBuf {
    explicit.cloned().unwrap_or_else(|| path_manager().config_file())
}

/// Everything a network command needs: validated config and a ready client
pub struct Context {
    pub config: Config,
    pub client: CatalogClient,
}

impl Context {
    pub fn load(explicit: Option<&PathBuf>) -> Result<Self> {
        let path = resolve_config_path(explicit);
        if !path.exists() {
            return Err(eyre!(
                "No configuration at {}. Run 'cinebrowse config init --base-url <URL> --token <TOKEN>' first.",
                path.display()
            ));
        }

        let config = Config::load_from_file(&path)
            .map_err(|e| eyre!("Failed to load config from {}: {}", path.display(), e))?;
        config
            .validate()
            .map_err(|e| eyre!("Invalid configuration in {}: {}", path.display(), e))?;

        let client = CatalogClient::from_config(&config.api)
            .map_err(|e| eyre!("{}", e))
            .wrap_err("Failed to create catalog client")?;

        Ok(Self { config, client })
    }
}

pub fn title_store() -> TitleStore {
    TitleStore::new(path_manager().titles_dir())
}
