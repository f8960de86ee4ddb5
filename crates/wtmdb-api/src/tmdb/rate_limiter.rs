//! Minimum-interval request pacing for the TMDB API.

use std::time::{Duration, Instant};

/// Default spacing between requests (~40 req/s, TMDB's documented ceiling).
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(25);

/// Spaces consecutive requests at least `min_interval` apart.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbRateLimiter {
    /// Minimum interval between requests.
    min_interval: Duration,
    /// Earliest instant the next request may start.
    next_slot: Option<Instant>,
}

impl TmdbRateLimiter {
    /// Creates a new rate limiter with the given minimum interval.
    pub(crate) const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_slot: None,
        }
    }

    /// Creates a new rate limiter with the default interval (25ms).
    pub(crate) const fn default_interval() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }

    /// Returns how long a request starting at `now` has to wait.
    fn delay_at(&self, now: Instant) -> Duration {
        self.next_slot
            .map_or(Duration::ZERO, |slot| slot.saturating_duration_since(now))
    }

    /// Waits for the next slot and reserves the one after it.
    pub async fn wait(&mut self) {
        let delay = self.delay_at(Instant::now());
        if !delay.is_zero() {
            tracing::trace!(?delay, "pacing TMDB request");
            tokio::time::sleep(delay).await;
        }

        let started = Instant::now();
        self.next_slot = started.checked_add(self.min_interval);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_first_request_does_not_wait() {
        // Arrange
        let mut limiter = TmdbRateLimiter::new(Duration::from_secs(1));

        // Act
        let start = Instant::now();
        limiter.wait().await;
        let elapsed = start.elapsed();

        // Assert
        assert!(elapsed < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_second_request_waits_min_interval() {
        // Arrange
        let mut limiter = TmdbRateLimiter::new(Duration::from_millis(50));

        // Act
        let start = Instant::now();
        limiter.wait().await;
        limiter.wait().await;
        let elapsed = start.elapsed();

        // Assert
        assert!(elapsed >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_wait_reserves_next_slot() {
        // Arrange
        let mut limiter = TmdbRateLimiter::new(Duration::from_secs(10));

        // Act
        limiter.wait().await;

        // Assert
        assert!(limiter.delay_at(Instant::now()) > Duration::from_secs(9));
    }

    #[test]
    fn test_zero_interval_never_delays() {
        // Arrange
        let mut limiter = TmdbRateLimiter::new(Duration::ZERO);
        limiter.next_slot = Some(Instant::now());

        // Act
        let delay = limiter.delay_at(Instant::now());

        // Assert
        assert_eq!(delay, Duration::ZERO);
    }

    #[test]
    fn test_default_interval() {
        // Arrange & Act
        let limiter = TmdbRateLimiter::default_interval();

        // Assert
        assert_eq!(limiter.min_interval, Duration::from_millis(25));
    }
}
