//! Database layer for the campaign store.
//!
//! This module handles all redb operations. Campaigns live in a single table keyed by
//! [`CampaignName`]; each mutation runs in its own write transaction, and redb admits only
//! one writer at a time.

use crate::store::db::error::DatabaseError;
use crate::types::value::versioned_value::VersionedValue;
use crate::types::value::versioned_value::latest_value::Value;
use crate::types::{AuthorizedUsers, CampaignName, Config, UserId};
use parking_lot::RwLock;
use redb::{ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use tracing::error;

pub mod error {
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum DatabaseError {
        #[error("Database error: {0}")]
        Redb(#[from] redb::DatabaseError),

        #[error("Table error: {0}")]
        TableError(#[from] redb::TableError),

        #[error("Storage error: {0}")]
        StorageError(#[from] redb::StorageError),

        #[error("Transaction error: {0}")]
        TransactionError(#[from] redb::TransactionError),

        #[error("Commit error: {0}")]
        CommitError(#[from] redb::CommitError),

        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),

        #[error("Database is closed")]
        Closed,

        #[error("Campaign not found")]
        NotFound,

        #[error("Campaign already exists")]
        AlreadyExists,

        #[error("User is not authorized for this campaign")]
        Unauthorized,

        #[error("User is already authorized for this campaign")]
        AlreadyAuthorized,
    }
}

/// Campaigns table: CampaignName → VersionedValue
const CAMPAIGNS_TABLE: TableDefinition<CampaignName, VersionedValue> =
    TableDefinition::new("campaigns");

/// The database struct wrapping redb.
///
/// The handle is `None` once [`Database::close`] has run.
pub struct Database {
    db: RwLock<Option<redb::Database>>,
}

impl Database {
    /// Creates or opens a database using paths from the config.
    pub fn new(config: &Config) -> Result<Self, DatabaseError> {
        std::fs::create_dir_all(&config.base_path)?;

        let db = redb::Database::create(config.db_path())?;

        // Initialize tables
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(CAMPAIGNS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self {
            db: RwLock::new(Some(db)),
        })
    }

    /// Returns `Err(Closed)` if the handle has been released.
    pub fn ensure_open(&self) -> Result<(), DatabaseError> {
        match self.db.read().as_ref() {
            Some(_) => Ok(()),
            None => Err(DatabaseError::Closed),
        }
    }

    /// Releases the redb handle. Returns `false` if it was already closed.
    ///
    /// Waits for in-flight transactions to finish.
    pub fn close(&self) -> bool {
        self.db.write().take().is_some()
    }
}

/// Create operations.
impl Database {
    /// Creates a campaign with `creator` as its only authorized user and empty notes.
    ///
    /// Returns `Err(AlreadyExists)` if the name is taken.
    pub fn create(&self, name: &CampaignName, creator: UserId) -> Result<(), DatabaseError> {
        self.write(|write_txn| {
            let mut table = write_txn.open_table(CAMPAIGNS_TABLE)?;

            if table.get(name)?.is_some() {
                return Err(DatabaseError::AlreadyExists);
            }

            let value = Value {
                authorized_users: AuthorizedUsers::with_creator(creator),
                notes: String::new(),
            };
            table.insert(name, &VersionedValue::V1(value))?;
            Ok(())
        })
    }
}

/// Read operations.
impl Database {
    /// Retrieves a campaign by name.
    pub fn get(&self, name: &CampaignName) -> Result<Option<Value>, DatabaseError> {
        self.read(|db| {
            let read_txn = db.begin_read()?;
            let table = read_txn.open_table(CAMPAIGNS_TABLE)?;

            match table.get(name)? {
                None => Ok(None),
                Some(guard) => Ok(Some(Self::extract_latest(guard.value()))),
            }
        })
    }

    /// Returns all campaign names in key order.
    pub fn names(&self) -> Result<Vec<CampaignName>, DatabaseError> {
        self.read(|db| {
            let read_txn = db.begin_read()?;
            let table = read_txn.open_table(CAMPAIGNS_TABLE)?;

            let mut names = Vec::new();
            for entry in table.iter()? {
                let (name, _) = entry?;
                names.push(name.value());
            }
            Ok(names)
        })
    }
}

/// Update operations.
impl Database {
    /// Appends `note` plus a blank-line separator to the campaign notes.
    ///
    /// Returns `Err(NotFound)` if the campaign doesn't exist.
    /// Returns `Err(Unauthorized)` if `user` is not authorized.
    pub fn append_notes(
        &self,
        name: &CampaignName,
        note: &str,
        user: &UserId,
    ) -> Result<(), DatabaseError> {
        self.write(|write_txn| {
            let mut table = write_txn.open_table(CAMPAIGNS_TABLE)?;

            let mut value = table
                .get(name)?
                .map(|g| Self::extract_latest(g.value()))
                .ok_or(DatabaseError::NotFound)?;

            if !value.authorized_users.contains(user) {
                return Err(DatabaseError::Unauthorized);
            }

            value.notes.push_str(note);
            value.notes.push_str("\n\n");

            table.insert(name, &VersionedValue::V1(value))?;
            Ok(())
        })
    }

    /// Adds `new_user` to the authorized users.
    ///
    /// Returns `Err(NotFound)` if the campaign doesn't exist.
    /// Returns `Err(Unauthorized)` if `requesting_user` is not authorized.
    /// Returns `Err(AlreadyAuthorized)` if `new_user` is already authorized.
    pub fn add_user(
        &self,
        name: &CampaignName,
        requesting_user: &UserId,
        new_user: UserId,
    ) -> Result<(), DatabaseError> {
        self.write(|write_txn| {
            let mut table = write_txn.open_table(CAMPAIGNS_TABLE)?;

            let mut value = table
                .get(name)?
                .map(|g| Self::extract_latest(g.value()))
                .ok_or(DatabaseError::NotFound)?;

            if !value.authorized_users.contains(requesting_user) {
                return Err(DatabaseError::Unauthorized);
            }

            if !value.authorized_users.insert(new_user) {
                return Err(DatabaseError::AlreadyAuthorized);
            }

            table.insert(name, &VersionedValue::V1(value))?;
            Ok(())
        })
    }
}

/// Internal helpers.
impl Database {
    fn extract_latest(versioned: VersionedValue) -> Value {
        match versioned {
            VersionedValue::V1(v) => v,
        }
    }

    fn read<T>(
        &self,
        f: impl FnOnce(&redb::Database) -> Result<T, DatabaseError>,
    ) -> Result<T, DatabaseError> {
        let guard = self.db.read();
        let db = guard.as_ref().ok_or(DatabaseError::Closed)?;
        f(db)
    }

    /// Runs `f` inside one write transaction: commit on `Ok`, abort on `Err`.
    fn write<T>(
        &self,
        f: impl FnOnce(&WriteTransaction) -> Result<T, DatabaseError>,
    ) -> Result<T, DatabaseError> {
        self.read(|db| {
            let write_txn = db.begin_write()?;
            match f(&write_txn) {
                Ok(value) => {
                    write_txn.commit()?;
                    Ok(value)
                }
                Err(err) => {
                    if let Err(abort_err) = write_txn.abort() {
                        error!(%abort_err, %err, "aborting write transaction failed");
                    }
                    Err(err)
                }
            }
        })
    }
}
