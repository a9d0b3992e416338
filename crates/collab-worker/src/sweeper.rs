// Realize sweep loop
//
// Periodically transitions every pending event whose date has passed to
// realized. Each tick runs one bulk update; a failed tick is logged and the
// next tick proceeds normally.

use chrono::Utc;
use collab_core::{EventService, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

/// Counters accumulated over the lifetime of [`RealizeSweeper::run`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub sweeps: u64,
    pub failures: u64,
    pub realized: u64,
}

pub struct RealizeSweeper {
    events: EventService,
    interval: Duration,
}

impl RealizeSweeper {
    pub fn new(events: EventService, interval: Duration) -> Self {
        Self { events, interval }
    }

    /// Run a single sweep with the current time as cutoff
    pub async fn run_once(&self) -> Result<u64> {
        self.events.mark_due_events_as_realized(Utc::now()).await
    }

    /// Sweep on every tick until `shutdown` resolves.
    ///
    /// The first sweep happens immediately. Ticks missed while a sweep is
    /// still running are delayed rather than fired in a burst.
    pub async fn run<F>(&self, shutdown: F) -> SweepStats
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let mut stats = SweepStats::default();
        info!(interval_secs = self.interval.as_secs(), "Realize sweeper started");

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Realize sweeper shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    stats.sweeps += 1;
                    match self.run_once().await {
                        Ok(realized) => stats.realized += realized,
                        Err(e) => {
                            stats.failures += 1;
                            error!(error = %e, "Realize sweep failed");
                        }
                    }
                }
            }
        }

        info!(
            sweeps = stats.sweeps,
            failures = stats.failures,
            realized = stats.realized,
            "Realize sweeper stopped"
        );
        stats
    }
}
