use std::time::{Duration, Instant};

/// Debouncer phase: nothing scheduled, or waiting for the quiet period to end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    Pending,
}

/// A simple debouncer that tracks when an action should be triggered
/// after a period of inactivity.
///
/// Every `trigger_at` replaces the previously scheduled deadline, so at most
/// one action is ever pending and it always belongs to the newest event. The
/// clock is always passed in by the caller.
#[derive(Debug, Clone)]
pub struct Debouncer {
    /// The duration to wait after the last event before triggering
    delay: Duration,
    /// When the last event occurred
    last_event: Option<Instant>,
}

impl Debouncer {
    /// Create a new debouncer with the specified delay in milliseconds
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            last_event: None,
        }
    }

    /// Register an event at `now`, cancelling whatever was pending
    pub fn trigger_at(&mut self, now: Instant) {
        self.last_event = Some(now);
    }

    /// Check if enough time has passed at `now` to execute the debounced
    /// action. Returns true exactly once per quiet period.
    pub fn should_execute_at(&mut self, now: Instant) -> bool {
        match self.last_event {
            Some(last) if now.saturating_duration_since(last) >= self.delay => {
                self.last_event = None;
                true
            }
            _ => false,
        }
    }

    /// Time left at `now` before the action will trigger.
    /// Returns None if no action is pending
    pub fn time_remaining_at(&self, now: Instant) -> Option<Duration> {
        self.last_event.map(|last| {
            self.delay
                .saturating_sub(now.saturating_duration_since(last))
        })
    }

    /// Reset the debouncer, canceling any pending action
    pub fn reset(&mut self) {
        self.last_event = None;
    }

    pub fn state(&self) -> DebounceState {
        if self.last_event.is_some() {
            DebounceState::Pending
        } else {
            DebounceState::Idle
        }
    }

    /// Check if there's a pending action
    pub fn is_pending(&self) -> bool {
        self.state() == DebounceState::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(300);
        assert_eq!(debouncer.state(), DebounceState::Idle);

        debouncer.trigger_at(start);
        assert_eq!(debouncer.state(), DebounceState::Pending);
        assert!(!debouncer.should_execute_at(start + Duration::from_millis(299)));
        assert!(debouncer.should_execute_at(start + Duration::from_millis(300)));
        assert_eq!(debouncer.state(), DebounceState::Idle);
        assert!(!debouncer.should_execute_at(start + Duration::from_millis(900)));
    }

    #[test]
    fn test_retrigger_restarts_delay() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(300);

        debouncer.trigger_at(start);
        debouncer.trigger_at(start + Duration::from_millis(200));

        // The first deadline must not fire
        assert!(!debouncer.should_execute_at(start + Duration::from_millis(300)));
        assert_eq!(
            debouncer.time_remaining_at(start + Duration::from_millis(300)),
            Some(Duration::from_millis(200))
        );
        assert!(debouncer.should_execute_at(start + Duration::from_millis(500)));
    }

    #[test]
    fn test_reset_cancels() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(100);
        debouncer.trigger_at(start);
        debouncer.reset();
        assert!(!debouncer.should_execute_at(start + Duration::from_secs(1)));
        assert_eq!(debouncer.time_remaining_at(start), None);
    }
}
