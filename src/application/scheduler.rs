// Poll scheduler - one fetch loop per view binding
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
}

impl PollConfig {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

/// Runs `fetch` immediately and then every `interval`, feeding each result to a sink.
///
/// The loop awaits each fetch before waiting for the next tick, so there is never
/// more than one fetch in flight. Ticks missed while a fetch is running collapse into
/// a single tick that fires once the fetch completes.
/// After [`PollScheduler::stop`] returns the sink is never called again. A fetch that
/// is already running is left to finish and its result is dropped.
pub struct PollScheduler {
    cancel: CancellationToken,
    // `true` while results may be delivered. The poll task holds this lock while
    // calling the sink, so `stop` cannot return in the middle of a delivery.
    live: Arc<Mutex<bool>>,
}

impl PollScheduler {
    /// Must be called from within a tokio runtime.
    pub fn start<F, Fut, R, S>(config: PollConfig, fetch: F, on_result: S) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: Send + 'static,
        S: FnMut(R) + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let live = Arc::new(Mutex::new(true));
        let period = config.interval.max(Duration::from_millis(1));

        // Detached: an in-flight fetch completes on its own after `stop` and is discarded.
        tokio::spawn(poll_loop(
            period,
            cancel.clone(),
            live.clone(),
            fetch,
            on_result,
        ));

        Self { cancel, live }
    }

    /// Idempotent.
    pub fn stop(&self) {
        let mut live = self.live.lock().unwrap_or_else(PoisonError::into_inner);
        if !*live {
            return;
        }
        *live = false;
        self.cancel.cancel();
    }

    pub fn is_running(&self) -> bool {
        *self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn poll_loop<F, Fut, R, S>(
    period: Duration,
    cancel: CancellationToken,
    live: Arc<Mutex<bool>>,
    mut fetch: F,
    mut on_result: S,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = R>,
    S: FnMut(R),
{
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        tracing::debug!("poll tick");
        let result = fetch().await;

        let delivered = {
            let live = live.lock().unwrap_or_else(PoisonError::into_inner);
            if *live {
                on_result(result);
            }
            *live
        };

        if !delivered {
            tracing::debug!("Discarding poll result that completed after stop");
            break;
        }
    }
}
