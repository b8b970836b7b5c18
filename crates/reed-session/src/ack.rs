//! Exactly-once acknowledgment bookkeeping for remote tool invocations.

use std::collections::HashSet;

use tracing::warn;

use reed_core::ids::CorrelationToken;

/// Tracks correlation tokens awaiting acknowledgment.
///
/// Every remote tool invocation registers its token; the acknowledgment
/// path consumes it. A token can be consumed at most once, so the
/// transport sees exactly one answer per invocation no matter how the
/// capture concluded.
#[derive(Debug, Default)]
pub struct AckTracker {
    pending: HashSet<CorrelationToken>,
}

impl AckTracker {
    /// Empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token awaiting acknowledgment. Returns false (and
    /// logs) if the token is already pending — duplicate invocations
    /// with the same token are a remote-side bug.
    pub fn register(&mut self, token: CorrelationToken) -> bool {
        let inserted = self.pending.insert(token.clone());
        if !inserted {
            warn!(token = %token, "duplicate tool invocation token");
        }
        inserted
    }

    /// Consume a token. Returns true only on the first call for a given
    /// token; the caller sends the acknowledgment iff this returns true.
    pub fn acknowledge(&mut self, token: &CorrelationToken) -> bool {
        self.pending.remove(token)
    }

    /// Drain everything still pending (session teardown). The drained
    /// tokens are never acknowledged.
    pub fn abandon_all(&mut self) -> Vec<CorrelationToken> {
        self.pending.drain().collect()
    }

    /// Number of tokens awaiting acknowledgment.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Whether any token is awaiting acknowledgment.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
