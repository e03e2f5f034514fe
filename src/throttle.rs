//! Rate limiting for viewport recomputation.
//!
//! Both helpers take the current `Instant` as an argument instead of reading
//! the clock, so the UI loop decides what "now" is and tests stay
//! deterministic.

use std::time::{Duration, Instant};

/// Default scroll throttle interval (one frame at 60 Hz).
pub const DEFAULT_SCROLL_INTERVAL: Duration = Duration::from_millis(16);

/// Default quiet period before a resize is applied.
pub const DEFAULT_RESIZE_DEBOUNCE: Duration = Duration::from_millis(120);

/// Leading-edge throttle that coalesces values.
///
/// The first value after a quiet interval passes through immediately; values
/// submitted within the interval replace each other and only the most recent
/// one is released by [`poll`](Self::poll) once the interval has elapsed.
#[derive(Debug, Clone)]
pub struct ScrollThrottle<T> {
    interval: Duration,
    last_emit: Option<Instant>,
    pending: Option<T>,
}

impl<T> ScrollThrottle<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_emit: None,
            pending: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    fn ready(&self, now: Instant) -> bool {
        match self.last_emit {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        }
    }

    /// Offers a value. Returns it if it may be applied right now.
    pub fn submit(&mut self, value: T, now: Instant) -> Option<T> {
        if self.ready(now) {
            self.last_emit = Some(now);
            self.pending = None;
            Some(value)
        } else {
            self.pending = Some(value);
            None
        }
    }

    /// Releases the latest superseded value once the interval has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.pending.is_some() && self.ready(now) {
            self.last_emit = Some(now);
            self.pending.take()
        } else {
            None
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value (if any) becomes releasable.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (&self.pending, self.last_emit) {
            (Some(_), Some(last)) => Some(last + self.interval),
            _ => None,
        }
    }
}

impl<T> Default for ScrollThrottle<T> {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLL_INTERVAL)
    }
}

/// Trailing-edge debounce: a value is released only after no new value
/// arrived for `delay`.
#[derive(Debug, Clone)]
pub struct ResizeDebounce<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> ResizeDebounce<T> {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    /// Records a new value, restarting the quiet period.
    pub fn notify(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// Releases the value if the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, at)) if now.saturating_duration_since(*at) >= self.delay => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }

    /// Drops the pending value without releasing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|(value, _)| value)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at + self.delay)
    }
}

impl<T> Default for ResizeDebounce<T> {
    fn default() -> Self {
        Self::new(DEFAULT_RESIZE_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_throttle_leading_edge_then_coalesce() {
        let t0 = Instant::now();
        let mut throttle = ScrollThrottle::new(ms(16));

        assert_eq!(throttle.submit(10.0, t0), Some(10.0));
        assert_eq!(throttle.submit(20.0, t0 + ms(4)), None);
        assert_eq!(throttle.submit(30.0, t0 + ms(8)), None);
        assert_eq!(throttle.next_deadline(), Some(t0 + ms(16)));

        // Too early
        assert_eq!(throttle.poll(t0 + ms(10)), None);
        // Only the latest superseding value survives
        assert_eq!(throttle.poll(t0 + ms(16)), Some(30.0));
        assert!(!throttle.has_pending());
        assert_eq!(throttle.poll(t0 + ms(100)), None);
    }

    #[test]
    fn test_throttle_passes_after_interval() {
        let t0 = Instant::now();
        let mut throttle = ScrollThrottle::new(ms(16));
        assert_eq!(throttle.submit(1, t0), Some(1));
        assert_eq!(throttle.submit(2, t0 + ms(20)), Some(2));
        assert_eq!(throttle.submit(3, t0 + ms(40)), Some(3));
    }

    #[test]
    fn test_debounce_waits_for_quiet_period() {
        let t0 = Instant::now();
        let mut debounce = ResizeDebounce::new(ms(100));

        debounce.notify(600.0, t0);
        debounce.notify(610.0, t0 + ms(50));
        assert_eq!(debounce.poll(t0 + ms(120)), None);
        assert_eq!(debounce.next_deadline(), Some(t0 + ms(150)));
        assert_eq!(debounce.poll(t0 + ms(150)), Some(610.0));
        assert!(!debounce.has_pending());
    }

    #[test]
    fn test_debounce_cancel_drops_pending() {
        let t0 = Instant::now();
        let mut debounce = ResizeDebounce::new(ms(100));

        debounce.notify(400.0, t0);
        assert_eq!(debounce.pending(), Some(&400.0));
        debounce.cancel();
        assert_eq!(debounce.next_deadline(), None);
        assert_eq!(debounce.poll(t0 + ms(500)), None);
    }
}
