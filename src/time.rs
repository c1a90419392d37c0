//! Wall clock abstraction, driving interpolations and the sequencer.

use std::{cell::Cell, rc::Rc, time::Instant};

// -------------------------------------------------------------------------------------------------

/// Time in seconds since some arbitrary, fixed origin. May be negative.
pub type SecondTime = f64;

// -------------------------------------------------------------------------------------------------

/// Provides the current time for the engine. All waiting in the engine is expressed as
/// comparisons against this clock, evaluated in each `update` call.
pub trait Clock {
    /// Current time in seconds.
    fn now(&self) -> SecondTime;
}

// -------------------------------------------------------------------------------------------------

/// Real time clock: seconds elapsed since the clock got created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> SecondTime {
        self.start.elapsed().as_secs_f64()
    }
}

// -------------------------------------------------------------------------------------------------

/// A manually advanced clock. Clones share the same time, so one clone can be passed to the
/// engine while another one controls it.
///
/// ```rust
/// use presets::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// let engine_clock = clock.clone();
/// clock.advance(1.5);
/// assert_eq!(engine_clock.now(), 1.5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    time: Rc<Cell<SecondTime>>,
}

impl ManualClock {
    /// Create a new clock, starting at time 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an absolute time.
    pub fn set(&self, time: SecondTime) {
        self.time.set(time);
    }

    /// Move the time forward by the given amount of seconds.
    pub fn advance(&self, seconds: SecondTime) {
        self.time.set(self.time.get() + seconds);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SecondTime {
        self.time.get()
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock() {
        let clock = ManualClock::new();
        let other = clock.clone();
        assert_eq!(other.now(), 0.0);
        clock.advance(0.25);
        clock.advance(0.25);
        assert_eq!(other.now(), 0.5);
        other.set(10.0);
        assert_eq!(clock.now(), 10.0);
    }

    #[test]
    fn system_clock() {
        let clock = SystemClock::new();
        let first = clock.now();
        assert!(first >= 0.0);
        assert!(clock.now() >= first);
    }
}
