//! Polling cadence

use std::time::Duration;
use tracing::debug;

use crate::config::MonitorConfig;

/// Chooses the delay before the next reconciliation pass
#[derive(Debug, Default)]
pub struct Cadence {
    fast_remaining: u32,
}

impl Cadence {
    /// Forces the fast interval for the next `cycles` passes
    pub fn set_fast_mode(&mut self, cycles: u32) {
        self.fast_remaining = cycles;
    }

    pub fn fast_remaining(&self) -> u32 {
        self.fast_remaining
    }

    /// Returns the delay after a completed pass, consuming one fast cycle
    /// if any remain
    pub fn next_delay(&mut self, config: &MonitorConfig, any_active: bool) -> Duration {
        if self.fast_remaining > 0 {
            self.fast_remaining -= 1;
            debug!(
                "Fast mode: next pass in {:?} ({} cycle(s) left)",
                config.fast_poll_interval, self.fast_remaining
            );
            return config.fast_poll_interval;
        }

        if any_active {
            config.active_poll_interval
        } else {
            config.idle_poll_interval
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_and_idle_delays() {
        let config = MonitorConfig::default();
        let mut cadence = Cadence::default();
        assert_eq!(cadence.next_delay(&config, true), config.active_poll_interval);
        assert_eq!(cadence.next_delay(&config, false), config.idle_poll_interval);
    }

    #[test]
    fn test_fast_mode_runs_out() {
        let config = MonitorConfig::default();
        let mut cadence = Cadence::default();
        cadence.set_fast_mode(2);

        assert_eq!(cadence.next_delay(&config, false), Duration::from_millis(800));
        assert_eq!(cadence.fast_remaining(), 1);
        assert_eq!(cadence.next_delay(&config, true), Duration::from_millis(800));
        assert_eq!(cadence.fast_remaining(), 0);
        assert_eq!(cadence.next_delay(&config, true), config.active_poll_interval);
        assert_eq!(cadence.next_delay(&config, false), config.idle_poll_interval);
    }

    #[test]
    fn test_fast_mode_overrides_previous_count() {
        let config = MonitorConfig::default();
        let mut cadence = Cadence::default();
        cadence.set_fast_mode(5);
        cadence.set_fast_mode(1);
        cadence.next_delay(&config, true);
        assert_eq!(cadence.fast_remaining(), 0);
    }
}
