use serde::{Deserialize, Serialize};

use super::ValueVariant;
use crate::types::AuthorizedUsers;

#[cfg_attr(test, derive(Eq, PartialEq))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Value {
    pub authorized_users: AuthorizedUsers,
    /// Append-only; empty means no notes yet.
    pub notes: String,
}

impl ValueVariant for Value {
    const VERSION: u8 = 1;
}
