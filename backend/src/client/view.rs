//! "Ignore late result" guard for views that issue overlapping requests.
//!
//! A view calls [`ViewScope::begin`] before each request and checks the
//! ticket when the result settles. Requests are never aborted; results for
//! a superseded ticket are simply dropped.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Generation counter shared by a view and its in-flight requests.
#[derive(Debug, Clone, Default)]
pub struct ViewScope {
    generation: Arc<AtomicU64>,
}

/// Marks one request issued by a [`ViewScope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding every earlier ticket.
    pub fn begin(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Ticket of the newest request without superseding it.
    pub fn ticket(&self) -> Ticket {
        Ticket(self.generation.load(Ordering::Acquire))
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::Acquire) == ticket.0
    }

    /// `Some(value)` when `ticket` is still current, `None` for a late result.
    pub fn settle<T>(&self, ticket: Ticket, value: T) -> Option<T> {
        self.is_current(ticket).then_some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn late_results_are_discarded() {
        let scope = ViewScope::new();
        let first = scope.begin();
        let second = scope.begin();

        assert_eq!(scope.settle(first, "page 1"), None);
        assert_eq!(scope.settle(second, "page 2"), Some("page 2"));
        assert_eq!(scope.ticket(), second);
    }

    #[rstest]
    fn clones_share_generation() {
        let scope = ViewScope::new();
        let ticket = scope.begin();
        scope.clone().begin();
        assert!(!scope.is_current(ticket));
    }
}
