pub mod config;
pub mod paths;
pub mod store;

pub use config::{ApiConfig, BrowseConfig, Config, SearchConfig};
pub use paths::{PathManager, BASE_PATH_ENV};
pub use store::TitleStore;
