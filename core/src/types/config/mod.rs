mod app;
mod core;

pub use app::{AppConfig, AppConfigError, PasteConfig, StorageConfig};
pub use self::core::Config;
