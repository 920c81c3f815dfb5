//! Reconciliation loop driver
//!
//! Runs one pass after another for a single loop token. Each pass runs in
//! its own task so a panic is reported as a failed pass instead of ending
//! the loop. The loop exits at the first check that finds its token stale.

use tracing::{debug, error, info};

use super::LoopToken;
use crate::error::MonitorError;
use crate::monitor::JobMonitor;
use crate::service::PassOutcome;

impl JobMonitor {
    /// Makes a new loop generation authoritative and schedules its first pass
    ///
    /// Passes still running under an older token drop their results at
    /// their next resumption.
    pub fn restart_loop(&self) -> LoopToken {
        let token = self.state().tokens.mint();
        self.spawn_loop(token);
        token
    }

    /// Forces the short polling interval for the next `cycles` passes
    ///
    /// The counter is set in the same critical section that retires the
    /// running loop, so only the new generation consumes fast cycles.
    pub fn set_fast_mode(&self, cycles: u32) -> LoopToken {
        info!("Fast mode engaged for {} cycle(s)", cycles);
        let token = {
            let mut state = self.state();
            state.cadence.set_fast_mode(cycles);
            state.tokens.mint()
        };
        self.spawn_loop(token);
        token
    }

    fn spawn_loop(&self, token: LoopToken) {
        debug!("Restarting reconciliation loop (generation {})", token.generation());

        let monitor = self.clone();
        tokio::spawn(async move {
            // Never run the first pass synchronously inside the caller
            tokio::task::yield_now().await;
            monitor.run_loop(token).await;
        });
    }

    async fn run_loop(&self, token: LoopToken) {
        loop {
            let monitor = self.clone();
            let pass = tokio::spawn(async move { monitor.reconcile(token).await });

            let any_active = match pass.await {
                Ok(PassOutcome::Stale) => {
                    debug!("Loop generation {} is stale, exiting", token.generation());
                    return;
                }
                Ok(PassOutcome::Completed { any_active }) => any_active,
                Err(e) => {
                    error!("Reconciliation pass failed: {}", e);
                    self.record_pass_error(
                        token,
                        MonitorError::TaskPanicked(e.to_string()),
                        None,
                        None,
                    );
                    false
                }
            };

            let delay = {
                let mut state = self.state();
                if !state.tokens.is_current(token) {
                    return;
                }
                let config = self.config();
                state.cadence.next_delay(config, any_active)
            };
            debug!("Next pass in {:?}", delay);

            tokio::time::sleep(delay).await;
        }
    }
}
