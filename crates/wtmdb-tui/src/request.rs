//! Request generations and the per-request fetch lifecycle.

use std::fmt;

/// Identifies one issued request of a given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of the most recent request of a kind.
///
/// `Idle -> Loading -> {Success, Failed}`. A superseded or cancelled request
/// never moves this state; its response is dropped instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    /// Nothing requested yet (or the owner was reset).
    #[default]
    Idle,
    /// Waiting for the current request.
    Loading,
    /// The current request's data was applied.
    Success,
    /// The current request failed; an error message is visible.
    Failed,
}

/// Hands out request ids and decides which response is still wanted.
///
/// Only the most recently issued id is live. Issuing a new request or
/// cancelling invalidates the previous one, so a late response can be
/// recognised and ignored.
#[derive(Debug, Default)]
pub struct RequestTracker {
    generation: u64,
    in_flight: Option<RequestId>,
}

impl RequestTracker {
    /// Issues a new request id.
    ///
    /// Returns the new id and the in-flight id it supersedes, if any.
    pub const fn begin(&mut self) -> (RequestId, Option<RequestId>) {
        self.generation = self.generation.wrapping_add(1);
        let id = RequestId(self.generation);
        let superseded = self.in_flight.replace(id);
        (id, superseded)
    }

    /// Invalidates the in-flight request, returning its id.
    pub const fn cancel(&mut self) -> Option<RequestId> {
        self.generation = self.generation.wrapping_add(1);
        self.in_flight.take()
    }

    /// Marks `id` as completed if it is the live request.
    ///
    /// Returns `false` for a superseded or cancelled id; its result must be dropped.
    pub fn finish(&mut self, id: RequestId) -> bool {
        if self.in_flight == Some(id) {
            self.in_flight = None;
            return true;
        }
        false
    }

    /// Whether a live request is outstanding.
    #[must_use]
    pub const fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_issues_distinct_ids() {
        // Arrange
        let mut tracker = RequestTracker::default();

        // Act
        let (first, none) = tracker.begin();
        let (second, superseded) = tracker.begin();

        // Assert
        assert_ne!(first, second);
        assert!(none.is_none());
        assert_eq!(superseded, Some(first));
    }

    #[test]
    fn test_superseded_response_is_rejected() {
        // Arrange
        let mut tracker = RequestTracker::default();
        let (first, _) = tracker.begin();
        let (second, _) = tracker.begin();

        // Act & Assert
        assert!(!tracker.finish(first));
        assert!(tracker.is_in_flight());
        assert!(tracker.finish(second));
        assert!(!tracker.is_in_flight());
    }

    #[test]
    fn test_cancelled_response_is_rejected() {
        // Arrange
        let mut tracker = RequestTracker::default();
        let (id, _) = tracker.begin();

        // Act
        let cancelled = tracker.cancel();

        // Assert
        assert_eq!(cancelled, Some(id));
        assert!(!tracker.finish(id));
    }

    #[test]
    fn test_finish_is_one_shot() {
        // Arrange
        let mut tracker = RequestTracker::default();
        let (id, _) = tracker.begin();

        // Act & Assert
        assert!(tracker.finish(id));
        assert!(!tracker.finish(id));
    }

    #[test]
    fn test_cancel_without_request() {
        // Arrange
        let mut tracker = RequestTracker::default();

        // Act & Assert
        assert!(tracker.cancel().is_none());
    }
}
