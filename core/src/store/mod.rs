//! Campaign store: authorization-checked, transactional persistence of campaign notebooks.

use crate::store::db::Database;
use crate::store::db::error::DatabaseError;
use crate::types::{Campaign, CampaignName, Config, UserId};
use error::StoreError;
use tracing::{debug, error};

pub(crate) mod db;

pub mod error {
    use thiserror::Error;

    #[derive(Debug, Error, PartialEq, Eq)]
    pub enum StoreError {
        #[error("no campaign named '{0}'")]
        NotFound(String),

        #[error("a campaign named '{0}' already exists")]
        DuplicateName(String),

        #[error("not authorized to modify campaign '{0}'")]
        Unauthorized(String),

        #[error("'{0}' is already authorized")]
        AlreadyAuthorized(String),

        #[error("invalid argument: {0}")]
        InvalidArgument(String),

        #[error("no notes yet for campaign '{0}'")]
        NoNotesYet(String),

        #[error("campaign store is unavailable")]
        StoreUnavailable,

        #[error("campaign store failure")]
        Backend,
    }
}

/// Shared handle to the campaign database.
///
/// Every operation takes `&self`; wrap the store in an `Arc` to share it between threads.
pub struct CampaignStore {
    db: Database,
}

impl CampaignStore {
    pub fn open(config: Config) -> Result<Self, StoreError> {
        let db = Database::new(&config).map_err(|err| {
            error!(path = %config.db_path().display(), %err, "failed to open campaign store");
            StoreError::StoreUnavailable
        })?;
        debug!(path = %config.db_path().display(), "campaign store opened");
        Ok(Self { db })
    }

    /// Releases the database. Later calls fail with `StoreUnavailable`.
    pub fn close(&self) {
        if self.db.close() {
            debug!("campaign store closed");
        }
    }
}

/// Read operations.
impl CampaignStore {
    /// Returns the notes of `name`.
    ///
    /// `NotFound` and `NoNotesYet` are distinct: the latter means the campaign exists but
    /// nothing has been appended yet.
    pub fn notes(&self, name: &str) -> Result<String, StoreError> {
        let campaign = self.campaign(name)?;
        if !campaign.has_notes() {
            return Err(StoreError::NoNotesYet(campaign.name.into()));
        }
        Ok(campaign.notes)
    }

    pub fn campaign(&self, name: &str) -> Result<Campaign, StoreError> {
        self.ensure_available()?;
        let name = parse_name(name)?;

        let value = self
            .db
            .get(&name)
            .map_err(|err| map_db_error(err, &name, "get campaign"))?
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;

        Ok(Campaign::from_latest_value(name, value))
    }

    pub fn campaign_names(&self) -> Result<Vec<CampaignName>, StoreError> {
        self.ensure_available()?;
        self.db.names().map_err(|err| {
            error!(%err, "list campaigns failed");
            backend_error(err)
        })
    }
}

/// Mutating operations.
impl CampaignStore {
    /// Creates a campaign whose only authorized user is `creator`.
    pub fn create_campaign(&self, name: &str, creator: &str) -> Result<(), StoreError> {
        self.ensure_available()?;
        let name = parse_name(name)?;
        let creator = parse_user(creator)?;

        self.db
            .create(&name, creator.clone())
            .map_err(|err| map_db_error(err, &name, "create campaign"))?;

        debug!(campaign = %name, %creator, "campaign created");
        Ok(())
    }

    /// Appends `note` followed by a blank line. Only authorized users may append.
    pub fn append_notes(
        &self,
        name: &str,
        note: &str,
        requesting_user: &str,
    ) -> Result<(), StoreError> {
        self.ensure_available()?;
        let name = parse_name(name)?;
        let user = parse_user(requesting_user)?;
        if note.is_empty() {
            return Err(StoreError::InvalidArgument("note must not be empty".into()));
        }

        self.db
            .append_notes(&name, note, &user)
            .map_err(|err| map_db_error(err, &name, "append notes"))?;

        debug!(campaign = %name, %user, bytes = note.len(), "notes appended");
        Ok(())
    }

    /// Authorizes `new_user` on behalf of an already authorized `requesting_user`.
    pub fn add_authorized_user(
        &self,
        name: &str,
        requesting_user: &str,
        new_user: &str,
    ) -> Result<(), StoreError> {
        self.ensure_available()?;
        let name = parse_name(name)?;
        let requesting_user = parse_user(requesting_user)?;
        let new_user = parse_user(new_user)?;

        self.db
            .add_user(&name, &requesting_user, new_user.clone())
            .map_err(|err| match err {
                DatabaseError::AlreadyAuthorized => {
                    StoreError::AlreadyAuthorized(new_user.to_string())
                }
                err => map_db_error(err, &name, "add authorized user"),
            })?;

        debug!(campaign = %name, %requesting_user, %new_user, "user authorized");
        Ok(())
    }
}

/// Internal helpers.
impl CampaignStore {
    fn ensure_available(&self) -> Result<(), StoreError> {
        self.db
            .ensure_open()
            .map_err(|_| StoreError::StoreUnavailable)
    }
}

fn parse_name(raw: &str) -> Result<CampaignName, StoreError> {
    CampaignName::try_from(raw)
        .map_err(|_| StoreError::InvalidArgument(format!("invalid campaign name '{raw}'")))
}

fn parse_user(raw: &str) -> Result<UserId, StoreError> {
    UserId::try_from(raw).map_err(|_| {
        StoreError::InvalidArgument(format!(
            "invalid user '{raw}': usernames are a single token"
        ))
    })
}

fn map_db_error(err: DatabaseError, name: &CampaignName, op: &'static str) -> StoreError {
    match err {
        DatabaseError::NotFound => StoreError::NotFound(name.to_string()),
        DatabaseError::AlreadyExists => StoreError::DuplicateName(name.to_string()),
        DatabaseError::Unauthorized => StoreError::Unauthorized(name.to_string()),
        err => {
            error!(campaign = %name, op, %err, "campaign store operation failed");
            backend_error(err)
        }
    }
}

fn backend_error(err: DatabaseError) -> StoreError {
    match err {
        DatabaseError::Closed => StoreError::StoreUnavailable,
        _ => StoreError::Backend,
    }
}

#[cfg(test)]
mod tests;
