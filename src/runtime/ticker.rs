//! Tokio-driven fixed-interval ticking of synchronous collaborators.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};

use crate::game::Orchard;

/// Something advanced by elapsed wall time.
pub trait Tick: Send {
    /// Advance by `elapsed` since the previous tick.
    fn tick(&mut self, elapsed: Duration);
}

impl Tick for Orchard {
    fn tick(&mut self, elapsed: Duration) {
        if let Err(e) = Self::tick(self, elapsed) {
            tracing::error!("orchard tick failed: {}", e);
        }
    }
}

/// Ticks a shared target on a tokio runtime at a fixed period.
pub struct TokioTicker {
    stop: watch::Sender<bool>,
    task: JoinHandle<u64>,
}

impl TokioTicker {
    /// Start ticking `target` every `period` on `handle`.
    pub fn spawn<T>(handle: &tokio::runtime::Handle, period: Duration, target: Arc<Mutex<T>>) -> Self
    where
        T: Tick + ?Sized + 'static,
    {
        let (stop, mut stopped) = watch::channel(false);
        let task = handle.spawn(async move {
            let mut timer = interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut last = Instant::now();
            let mut ticks = 0_u64;
            loop {
                tokio::select! {
                    _ = timer.tick() => {
                        let now = Instant::now();
                        target.lock().tick(now - last);
                        last = now;
                        ticks += 1;
                    }
                    _ = stopped.changed() => break,
                }
            }
            tracing::debug!("ticker stopped after {} tick(s)", ticks);
            ticks
        });
        Self { stop, task }
    }

    /// Stop ticking and return how many ticks ran.
    ///
    /// # Errors
    ///
    /// Returns the join error if the ticking task panicked.
    pub async fn stop(self) -> Result<u64, tokio::task::JoinError> {
        let _ = self.stop.send(true);
        self.task.await
    }
}
