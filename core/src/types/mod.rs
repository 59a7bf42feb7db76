pub(crate) mod config;
pub use config::{AppConfig, AppConfigError, Config, PasteConfig, StorageConfig};

pub(crate) mod campaign_name;
pub use campaign_name::{CampaignName, MAX_CAMPAIGN_NAME_LENGTH};

pub(crate) mod user_id;
pub use user_id::{MAX_USER_ID_LENGTH, UserId};

pub(crate) mod authorized_users;
pub use authorized_users::AuthorizedUsers;

pub(crate) mod fingerprint;
pub use fingerprint::Fingerprint;

pub(crate) mod value;
pub use value::Campaign;
