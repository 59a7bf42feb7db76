use crate::types::UserId;
use serde::{Deserialize, Serialize};

/// Users permitted to mutate a campaign.
///
/// Membership is exact equality on normalized [`UserId`]s. Insertion order is kept so the
/// creator always comes first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizedUsers(Vec<UserId>);

impl AuthorizedUsers {
    pub fn with_creator(creator: UserId) -> Self {
        Self(vec![creator])
    }

    pub fn contains(&self, user: &UserId) -> bool {
        self.0.contains(user)
    }

    /// Adds `user`, returning `false` if it was already present.
    pub fn insert(&mut self, user: UserId) -> bool {
        if self.contains(&user) {
            return false;
        }
        self.0.push(user);
        true
    }

    pub fn creator(&self) -> Option<&UserId> {
        self.0.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserId> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a AuthorizedUsers {
    type Item = &'a UserId;
    type IntoIter = std::slice::Iter<'a, UserId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
