//! Background rental expiry sweep.
//!
//! Runs [`RentalService::run_expiry_sweep`] on a fixed cadence. Every
//! transition the sweep performs is claimed through the repository CAS, so
//! it is safe to run alongside manual cancel/extend requests and alongside
//! a second process sweeping the same store.

use std::sync::Arc;
use std::time::Duration;

use dialgate_core::services::RentalService;
use tokio::task::JoinHandle;

/// Default sweep cadence.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Periodic expiry sweep driver.
pub struct SweepScheduler {
    rental_service: Arc<RentalService>,
    interval: Duration,
}

impl SweepScheduler {
    #[must_use]
    pub fn new(rental_service: Arc<RentalService>) -> Self {
        Self {
            rental_service,
            interval: DEFAULT_SWEEP_INTERVAL,
        }
    }

    /// Override the sweep cadence.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Spawn the sweep loop on the current runtime.
    ///
    /// The first sweep runs after one full interval, not at startup; a
    /// restart storm therefore does not hammer the provider API. Abort the
    /// returned handle to stop sweeping.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            ticker.tick().await; // first tick completes immediately

            loop {
                ticker.tick().await;
                match self.rental_service.run_expiry_sweep(chrono::Utc::now()).await {
                    Ok(report) => {
                        if report.processed > 0 {
                            log::info!(
                                "Expiry sweep: {} processed, {} expired, {} cancelled, {} release failures",
                                report.processed,
                                report.expired,
                                report.cancelled,
                                report.release_failures
                            );
                        } else {
                            log::debug!("Expiry sweep: nothing due");
                        }
                    }
                    Err(e) => {
                        log::error!("Expiry sweep failed: {e}");
                    }
                }
            }
        })
    }
}
