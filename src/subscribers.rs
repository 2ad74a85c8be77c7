//! Subscriber registry for a quest.
//!
//! A quest's subscriber count is the number of distinct identities, not the
//! number of consent claims: one participant may re-attest consent over time
//! and must still count once. The view also exposes the membership set so a
//! viewer can be checked for "already subscribed" without another fetch.

use std::collections::HashSet;

use serde::Serialize;

use crate::model::Subscriber;

/// Distinct-identity view over a subscriber batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SubscriberView {
    members: HashSet<String>,
}

impl SubscriberView {
    /// Build the view from a fetched subscriber batch.
    pub fn register(batch: &[Subscriber]) -> Self {
        let members = batch
            .iter()
            .map(|sub| sub.user_npub.clone())
            .collect::<HashSet<_>>();
        Self { members }
    }

    /// Number of distinct subscriber identities.
    pub fn count(&self) -> usize {
        self.members.len()
    }

    /// Membership check by identity.
    pub fn contains(&self, identity: &str) -> bool {
        self.members.contains(identity)
    }

    pub fn members(&self) -> &HashSet<String> {
        &self.members
    }
}
