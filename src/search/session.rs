//! Stale-result suppression for interactive search.
//!
//! Each keystroke issues a new [`QueryTicket`]. When a response arrives the
//! caller checks its ticket against the session; only the most recently
//! issued ticket is accepted.

use std::sync::atomic::{AtomicU64, Ordering};

/// Generation number attached to a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryTicket(u64);

impl QueryTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Issues tickets and tracks the latest one
#[derive(Debug, Default)]
pub struct SearchSession {
    latest: AtomicU64,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new query, invalidating every earlier ticket
    pub fn issue(&self) -> QueryTicket {
        QueryTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` is still the latest issued
    pub fn is_current(&self, ticket: QueryTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Hand back `value` only if its ticket is still current
    pub fn accept<T>(&self, ticket: QueryTicket, value: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(value)
        } else {
            tracing::debug!(generation = ticket.0, "Dropping stale search response");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tickets_increase() {
        let session = SearchSession::new();
        let a = session.issue();
        let b = session.issue();
        assert!(b > a);
        assert_eq!(b.generation(), 2);
    }

    #[test]
    fn test_only_latest_is_accepted() {
        let session = SearchSession::new();
        let first = session.issue();
        let second = session.issue();

        assert_eq!(session.accept(first, "old"), None);
        assert_eq!(session.accept(second, "new"), Some("new"));
    }

    #[test]
    fn test_out_of_order_completion() {
        let session = SearchSession::new();
        let slow = session.issue();
        let fast = session.issue();

        // fast finishes first and is shown; slow arrives later and is dropped
        assert!(session.accept(fast, vec![1]).is_some());
        assert!(session.accept(slow, vec![2]).is_none());
    }
}
