//! Session ticket cache.

use std::collections::HashMap;
use std::future::Future;

use tokio::sync::Mutex;

use crate::error::Result;

/// Cache key: one ticket per user per server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TicketKey {
    pub user: String,
    pub port: String,
}

impl TicketKey {
    #[must_use]
    pub fn new(user: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            port: port.into(),
        }
    }
}

/// Maps `(user, port)` to a session ticket.
///
/// Entries are inserted once and never refreshed or evicted. A ticket the
/// server has since revoked keeps being handed out; the failure only shows up
/// when a query using it is rejected.
#[derive(Debug, Default)]
pub struct TicketCache {
    entries: Mutex<HashMap<TicketKey, String>>,
}

impl TicketCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache holding one known ticket.
    #[must_use]
    pub fn seeded(key: TicketKey, ticket: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key, ticket.into());
        Self {
            entries: Mutex::new(entries),
        }
    }

    /// Look up a cached ticket.
    pub async fn get(&self, key: &TicketKey) -> Option<String> {
        self.entries.lock().await.get(key).cloned()
    }

    /// Number of cached tickets.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Whether no ticket is cached.
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Return the cached ticket for `key`, or run `login` and cache its result.
    ///
    /// The lock is held while `login` runs, so concurrent callers for the same
    /// cache wait for the first login instead of starting their own.
    ///
    /// # Errors
    ///
    /// Propagates the error of `login`; nothing is cached in that case.
    pub async fn get_or_login<F, Fut>(&self, key: &TicketKey, login: F) -> Result<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String>>,
    {
        let mut entries = self.entries.lock().await;
        if let Some(ticket) = entries.get(key) {
            tracing::debug!(user = %key.user, port = %key.port, "Using cached ticket");
            return Ok(ticket.clone());
        }

        let ticket = login().await?;
        entries.insert(key.clone(), ticket.clone());
        Ok(ticket)
    }
}
