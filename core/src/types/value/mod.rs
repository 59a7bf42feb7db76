//! Public campaign types for consumers.
//!
//! The `Campaign` type is exported from `dungeonbot_core::types`.

pub(crate) mod versioned_value;

use crate::types::{AuthorizedUsers, CampaignName};
use versioned_value::latest_value;

/// A campaign read from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Campaign {
    pub name: CampaignName,
    pub authorized_users: AuthorizedUsers,
    pub notes: String,
}

impl Campaign {
    pub(crate) fn from_latest_value(name: CampaignName, value: latest_value::Value) -> Self {
        Self {
            name,
            authorized_users: value.authorized_users,
            notes: value.notes,
        }
    }

    pub fn has_notes(&self) -> bool {
        !self.notes.is_empty()
    }
}
