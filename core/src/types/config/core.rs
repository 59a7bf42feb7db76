use std::path::PathBuf;

/// Core configuration for `CampaignStore` initialization.
#[derive(Clone, Debug)]
pub struct Config {
    pub base_path: PathBuf,
}

impl Config {
    pub fn db_path(&self) -> PathBuf {
        self.base_path.join("campaigns.redb")
    }
}
