//! Scheduled refresh for dashboard-style views.
//!
//! A [`Poller`] re-runs one fetch on a fixed period until its cancellation
//! token fires. Each fetch is awaited before the next tick is taken, so ticks
//! never overlap; ticks missed while a slow fetch was in flight are skipped
//! rather than replayed in a burst. Failed fetches are logged and the
//! schedule keeps going.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Shortest period a poller accepts; `tokio::time::interval` rejects zero.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSummary {
    pub ticks: u64,
    pub failures: u64,
}

#[derive(Debug, Clone)]
pub struct Poller {
    name: &'static str,
    interval: Duration,
    cancel: CancellationToken,
}

impl Poller {
    pub fn new(name: &'static str, interval: Duration) -> Self {
        Self {
            name,
            interval: interval.max(MIN_INTERVAL),
            cancel: CancellationToken::new(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Token that stops the schedule when cancelled. Cancelling also drops a
    /// fetch that is still in flight.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Fetch immediately, then once per interval, handing each success to
    /// `on_update`. Returns when the token is cancelled.
    pub async fn run<F, Fut, T, E, U>(&self, mut fetch: F, mut on_update: U) -> PollSummary
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
        U: FnMut(T),
    {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut summary = PollSummary::default();

        info!(
            event = "core.polling.run_started",
            poller = self.name,
            interval_ms = self.interval.as_millis() as u64
        );

        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                _ = interval.tick() => {}
            }

            summary.ticks += 1;
            let result = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                result = fetch() => result,
            };

            match result {
                Ok(value) => {
                    debug!(
                        event = "core.polling.tick_completed",
                        poller = self.name,
                        tick = summary.ticks
                    );
                    on_update(value);
                }
                Err(e) => {
                    summary.failures += 1;
                    warn!(
                        event = "core.polling.tick_failed",
                        poller = self.name,
                        tick = summary.ticks,
                        error = %e
                    );
                }
            }
        }

        info!(
            event = "core.polling.run_completed",
            poller = self.name,
            ticks = summary.ticks,
            failures = summary.failures
        );
        summary
    }

    /// Run the schedule on a background task. Dropping the returned handle
    /// cancels it.
    pub fn spawn<F, Fut, T, E, U>(self, fetch: F, on_update: U) -> PollHandle
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send,
        T: Send,
        E: Display + Send,
        U: FnMut(T) + Send + 'static,
    {
        let cancel = self.cancel.clone();
        let task = tokio::spawn(async move { self.run(fetch, on_update).await });
        PollHandle {
            cancel,
            task: Some(task),
        }
    }
}

/// Owner of a spawned schedule.
#[derive(Debug)]
pub struct PollHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<PollSummary>>,
}

impl PollHandle {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancel and wait for the task to wind down.
    pub async fn stop(mut self) -> PollSummary {
        self.cancel.cancel();
        let Some(task) = self.task.take() else {
            return PollSummary::default();
        };
        match task.await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(event = "core.polling.join_failed", error = %e);
                PollSummary::default()
            }
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::Instant;

    const PERIOD: Duration = Duration::from_secs(30);

    #[tokio::test(start_paused = true)]
    async fn test_fetches_immediately_then_every_period() {
        let poller = Poller::new("test", PERIOD);
        let cancel = poller.cancel_token();
        let start = Instant::now();
        let mut seen = Vec::new();

        let summary = poller
            .run(
                || async { Ok::<_, String>(Instant::now()) },
                |at| {
                    seen.push(at - start);
                    if seen.len() == 3 {
                        cancel.cancel();
                    }
                },
            )
            .await;

        assert_eq!(summary, PollSummary { ticks: 3, failures: 0 });
        assert_eq!(seen, vec![Duration::ZERO, PERIOD, PERIOD * 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_do_not_stop_the_schedule() {
        let poller = Poller::new("test", PERIOD);
        let cancel = poller.cancel_token();
        let calls = AtomicUsize::new(0);

        let summary = poller
            .run(
                || {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    async move {
                        if n < 2 {
                            Err("backend unavailable".to_string())
                        } else {
                            Ok(n)
                        }
                    }
                },
                |_| cancel.cancel(),
            )
            .await;

        assert_eq!(summary, PollSummary { ticks: 3, failures: 2 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_fetches_never_overlap() {
        let poller = Poller::new("test", PERIOD);
        let cancel = poller.cancel_token();
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_in_flight = Arc::new(AtomicUsize::new(0));
        let mut updates = 0;

        let summary = poller
            .run(
                || {
                    let in_flight = in_flight.clone();
                    let max_in_flight = max_in_flight.clone();
                    async move {
                        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                        max_in_flight.fetch_max(now, Ordering::SeqCst);
                        tokio::time::sleep(PERIOD * 2 + Duration::from_secs(10)).await;
                        in_flight.fetch_sub(1, Ordering::SeqCst);
                        Ok::<_, String>(())
                    }
                },
                |_| {
                    updates += 1;
                    if updates == 3 {
                        cancel.cancel();
                    }
                },
            )
            .await;

        assert_eq!(summary.ticks, 3);
        assert_eq!(max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_interrupts_in_flight_fetch() {
        let poller = Poller::new("test", PERIOD);
        let cancel = poller.cancel_token();

        let summary = poller
            .run(
                || {
                    let cancel = cancel.clone();
                    async move {
                        cancel.cancel();
                        tokio::time::sleep(Duration::from_secs(3600)).await;
                        Ok::<_, String>(())
                    }
                },
                |_| panic!("cancelled fetch must not publish"),
            )
            .await;

        assert_eq!(summary, PollSummary { ticks: 1, failures: 0 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_stops_spawned_schedule() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let handle = Poller::new("test", PERIOD).spawn(
            || async { Ok::<_, String>(()) },
            move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            },
        );

        tokio::time::sleep(PERIOD * 2 + Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);

        drop(handle);
        tokio::time::sleep(PERIOD * 4).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_returns_summary() {
        let handle =
            Poller::new("test", PERIOD).spawn(|| async { Err::<(), _>("down".to_string()) }, |_| {});
        tokio::time::sleep(PERIOD + Duration::from_secs(1)).await;

        let summary = handle.stop().await;
        assert_eq!(summary, PollSummary { ticks: 2, failures: 2 });
    }

    #[test]
    fn test_zero_interval_is_raised() {
        assert_eq!(Poller::new("test", Duration::ZERO).interval(), MIN_INTERVAL);
    }
}
