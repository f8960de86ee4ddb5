//! Clock-injected debouncer.

use std::time::{Duration, Instant};

/// Default delay before a typed query is propagated (500ms).
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// A value waiting for its quiet period to elapse.
#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

/// Delays propagation of a changing value until it has been stable for `delay`.
///
/// Every [`push`](Self::push) restarts the timer and replaces the pending
/// value. The caller drives time: [`poll`](Self::poll) settles the pending
/// value once its deadline has passed, [`flush`](Self::flush) settles it
/// immediately.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    settled: T,
    pending: Option<Pending<T>>,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    /// Creates a debouncer whose settled value starts at `initial`.
    pub const fn new(initial: T, delay: Duration) -> Self {
        Self {
            delay,
            settled: initial,
            pending: None,
        }
    }

    /// Returns the last settled value.
    pub const fn settled(&self) -> &T {
        &self.settled
    }

    /// Returns when the pending value settles, if one is waiting.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Records a new input value, cancelling any pending one.
    pub fn push(&mut self, value: T, now: Instant) {
        let deadline = now.checked_add(self.delay).unwrap_or(now);
        self.pending = Some(Pending { value, deadline });
    }

    /// Settles the pending value if its deadline has passed.
    ///
    /// Returns the new settled value only when it differs from the previous one.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.deadline().is_some_and(|deadline| deadline <= now) {
            return self.flush();
        }
        None
    }

    /// Settles the pending value immediately.
    ///
    /// Returns the new settled value only when it differs from the previous one.
    pub fn flush(&mut self) -> Option<T> {
        let pending = self.pending.take()?;
        if pending.value == self.settled {
            return None;
        }
        self.settled = pending.value;
        Some(self.settled.clone())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::arithmetic_side_effects)]

    use super::*;

    const DELAY: Duration = Duration::from_millis(500);

    #[test]
    fn test_value_settles_after_delay() {
        // Arrange
        let start = Instant::now();
        let mut debouncer = Debouncer::new(String::new(), DELAY);

        // Act
        debouncer.push(String::from("mat"), start);
        let early = debouncer.poll(start + Duration::from_millis(499));
        let settled = debouncer.poll(start + DELAY);

        // Assert
        assert!(early.is_none());
        assert_eq!(settled.as_deref(), Some("mat"));
        assert_eq!(debouncer.settled(), "mat");
        assert!(debouncer.deadline().is_none());
    }

    #[test]
    fn test_burst_collapses_into_last_value() {
        // Arrange
        let start = Instant::now();
        let mut debouncer = Debouncer::new(String::new(), DELAY);

        // Act: three keystrokes 200ms apart, each restarting the timer
        debouncer.push(String::from("m"), start);
        debouncer.push(String::from("ma"), start + Duration::from_millis(200));
        debouncer.push(String::from("mat"), start + Duration::from_millis(400));
        let at_first_deadline = debouncer.poll(start + DELAY);
        let at_last_deadline = debouncer.poll(start + Duration::from_millis(900));

        // Assert
        assert!(at_first_deadline.is_none());
        assert_eq!(at_last_deadline.as_deref(), Some("mat"));
    }

    #[test]
    fn test_returning_to_settled_value_reports_nothing() {
        // Arrange
        let start = Instant::now();
        let mut debouncer = Debouncer::new(String::from("matrix"), DELAY);

        // Act
        debouncer.push(String::from("matri"), start);
        debouncer.push(String::from("matrix"), start + Duration::from_millis(100));
        let result = debouncer.poll(start + Duration::from_secs(1));

        // Assert
        assert!(result.is_none());
        assert!(debouncer.deadline().is_none());
    }

    #[test]
    fn test_flush_settles_immediately() {
        // Arrange
        let start = Instant::now();
        let mut debouncer = Debouncer::new(String::new(), DELAY);
        debouncer.push(String::from("alien"), start);

        // Act
        let flushed = debouncer.flush();

        // Assert
        assert_eq!(flushed.as_deref(), Some("alien"));
        assert!(debouncer.poll(start + DELAY).is_none());
    }

    #[test]
    fn test_deadline_tracks_latest_push() {
        // Arrange
        let start = Instant::now();
        let mut debouncer = Debouncer::new(0_u32, DELAY);

        // Act
        debouncer.push(1, start);
        debouncer.push(2, start + Duration::from_millis(300));

        // Assert
        assert_eq!(
            debouncer.deadline(),
            Some(start + Duration::from_millis(800))
        );
    }
}
