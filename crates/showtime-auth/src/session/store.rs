//! Identity → current refresh credential.
//!
//! At most one refresh credential is live per identity. Compound
//! operations (`rotate`) run under a single write-lock acquisition so a
//! concurrent request for the same identity cannot interleave between the
//! comparison and the write.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;

/// Result of presenting a refresh credential for rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationOutcome {
    /// The credential matched and was replaced.
    Rotated,
    /// The credential was stale or unknown; the entry has been removed.
    ReuseDetected,
}

/// Thread-safe map of identity to its live refresh credential.
#[derive(Debug, Default)]
pub struct SessionStore {
    entries: RwLock<HashMap<u64, String>>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `credential` as the identity's live refresh credential,
    /// replacing any previous one.
    pub async fn set(&self, identity_id: u64, credential: impl Into<String>) {
        self.entries
            .write()
            .await
            .insert(identity_id, credential.into());
    }

    /// The identity's live refresh credential, if any.
    pub async fn get(&self, identity_id: u64) -> Option<String> {
        self.entries.read().await.get(&identity_id).cloned()
    }

    /// Remove the identity's entry. Returns whether one existed.
    pub async fn delete(&self, identity_id: u64) -> bool {
        self.entries.write().await.remove(&identity_id).is_some()
    }

    /// True iff an entry exists and equals `candidate` exactly.
    pub async fn validate(&self, identity_id: u64, candidate: &str) -> bool {
        self.entries
            .read()
            .await
            .get(&identity_id)
            .is_some_and(|current| current == candidate)
    }

    /// Validate `presented` and, in the same critical section, either
    /// replace it with the credential produced by `mint` or delete the
    /// entry.
    ///
    /// `mint` runs only when the presented credential matches. If it fails
    /// the entry is left untouched.
    pub async fn rotate<F, E>(
        &self,
        identity_id: u64,
        presented: &str,
        mint: F,
    ) -> Result<RotationOutcome, E>
    where
        F: FnOnce() -> Result<String, E>,
    {
        let mut entries = self.entries.write().await;
        let matches = entries
            .get(&identity_id)
            .is_some_and(|current| current == presented);

        if matches {
            let replacement = mint()?;
            entries.insert(identity_id, replacement);
            debug!(identity_id, "Refresh credential rotated");
            Ok(RotationOutcome::Rotated)
        } else {
            entries.remove(&identity_id);
            Ok(RotationOutcome::ReuseDetected)
        }
    }

    /// Number of identities with a live refresh credential.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether no identity has a live refresh credential.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
