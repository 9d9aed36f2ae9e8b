use crate::backoff::Backoff;
use crate::source::Fetch;
use std::future::Future;
use std::time::Duration;
use telemetry_history::{ChannelMode, ChartSink, HistoryBatch, MergeContext, SlidingWindow};
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, warn};

/// Shutdown signal handed to a polling loop.
///
/// Fires when the owning [`PollTask`] is cancelled or dropped.
#[derive(Debug, Clone)]
pub struct Shutdown(watch::Receiver<bool>);

impl Shutdown {
    /// Resolves once shutdown has been requested.
    pub async fn requested(&mut self) {
        // A dropped sender means nobody can cancel us any more; stop as well.
        let _ = self.0.wait_for(|&stop| stop).await;
    }
}

/// A spawned polling loop that can be cancelled and restarted.
///
/// Cancelling hands back whatever the loop returns, so its state can seed
/// the next run.
pub struct PollTask<R> {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<R>,
}

impl<R: Send + 'static> PollTask<R> {
    pub fn spawn<F, Fut>(run: F) -> Self
    where
        F: FnOnce(Shutdown) -> Fut,
        Fut: Future<Output = R> + Send + 'static,
    {
        let (shutdown, signal) = watch::channel(false);
        let handle = tokio::spawn(run(Shutdown(signal)));
        Self { shutdown, handle }
    }

    /// True once the loop has returned on its own (e.g. its sink closed).
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Ask the loop to stop and wait for its result.
    pub async fn cancel(self) -> Result<R, JoinError> {
        // The loop may already have exited and dropped its receiver.
        let _ = self.shutdown.send(true);
        self.handle.await
    }
}

#[derive(Debug, Error)]
#[error("sample sink closed")]
pub struct SinkClosed;

/// Consumer of polled samples, e.g. the window's redraw scheduler.
///
/// `submit` resolves once the sample has been consumed (for a window: drawn),
/// so the producer never runs ahead of the consumer.
pub trait SampleSink<T>: Send {
    fn submit(&mut self, sample: T) -> impl Future<Output = Result<(), SinkClosed>> + Send;
}

/// Consumed as soon as it is queued.
impl<T: Send> SampleSink<T> for mpsc::UnboundedSender<T> {
    fn submit(&mut self, sample: T) -> impl Future<Output = Result<(), SinkClosed>> + Send {
        std::future::ready(self.send(sample).map_err(|_| SinkClosed))
    }
}

/// Why a polling loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    Cancelled,
    SinkClosed,
}

/// Fetch samples and hand each to `sink`, one at a time.
///
/// There is no timer: the next fetch starts as soon as the sink has consumed
/// the previous sample, so the rate is bounded by the round trip and by how
/// fast the sink draws. A failed fetch waits the backoff delay and retries.
pub async fn run_orientation_loop<T, S, K>(
    mut source: S,
    mut sink: K,
    mut backoff: Backoff,
    mut shutdown: Shutdown,
) -> LoopExit
where
    S: Fetch<T>,
    K: SampleSink<T>,
{
    info!("Orientation poll started");
    let mut samples: u64 = 0;
    loop {
        let fetched = tokio::select! {
            biased;
            _ = shutdown.requested() => return LoopExit::Cancelled,
            fetched = source.fetch() => fetched,
        };

        match fetched {
            Ok(sample) => {
                backoff.reset();
                let submitted = tokio::select! {
                    biased;
                    _ = shutdown.requested() => return LoopExit::Cancelled,
                    submitted = sink.submit(sample) => submitted,
                };
                if submitted.is_err() {
                    info!(samples, "Orientation sink closed, stopping poll");
                    return LoopExit::SinkClosed;
                }
                samples += 1;
                if samples % 500 == 0 {
                    debug!(samples, "Orientation poll heartbeat");
                }
            }
            Err(e) => {
                let delay = backoff.next_delay();
                warn!(error = %e, delay_ms = delay.as_millis() as u64, "Orientation fetch failed");
                tokio::select! {
                    biased;
                    _ = shutdown.requested() => return LoopExit::Cancelled,
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }
    }
}

/// History chart state carried across restarts of the history loop.
#[derive(Debug, Clone, Default)]
pub struct HistoryState {
    pub window: SlidingWindow,
    pub context: MergeContext,
}

/// Fetch a history batch, merge it, redraw, wait `interval`, repeat.
pub struct HistoryLoop<S, C> {
    source: S,
    chart: C,
    state: HistoryState,
    mode: watch::Receiver<ChannelMode>,
    interval: Duration,
    backoff: Backoff,
}

impl<S, C> HistoryLoop<S, C>
where
    S: Fetch<HistoryBatch>,
    C: ChartSink,
{
    pub fn new(
        source: S,
        chart: C,
        mode: watch::Receiver<ChannelMode>,
        interval: Duration,
        backoff: Backoff,
    ) -> Self {
        let state = HistoryState {
            window: SlidingWindow::new(),
            context: MergeContext::new(*mode.borrow()),
        };
        Self {
            source,
            chart,
            state,
            mode,
            interval,
            backoff,
        }
    }

    /// Resume from the state a previous run returned.
    pub fn with_state(mut self, state: HistoryState) -> Self {
        self.state = state;
        self
    }

    /// Run until shutdown; returns the final window and merge context.
    pub async fn run(mut self, mut shutdown: Shutdown) -> HistoryState {
        info!(
            interval_ms = self.interval.as_millis() as u64,
            mode = ?self.state.context.mode,
            "History poll started"
        );
        loop {
            let fetched = tokio::select! {
                biased;
                _ = shutdown.requested() => break,
                fetched = self.source.fetch() => fetched,
            };

            let delay = match fetched {
                Ok(batch) => {
                    self.backoff.reset();
                    self.apply(&batch);
                    self.interval
                }
                Err(e) => {
                    let delay = self.backoff.next_delay();
                    warn!(error = %e, delay_ms = delay.as_millis() as u64, "History fetch failed");
                    delay
                }
            };

            tokio::select! {
                biased;
                _ = shutdown.requested() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }
        info!(last_step = self.state.context.last_step, "History poll stopped");
        self.state
    }

    fn apply(&mut self, batch: &HistoryBatch) {
        let mode = *self.mode.borrow_and_update();
        if mode != self.state.context.mode {
            info!(?mode, "History channel mode switched");
            self.state.context.mode = mode;
        }

        match self.state.window.merge(batch, self.state.context) {
            Ok(context) => {
                self.state.context = context;
                self.chart.redraw(&self.state.window.chart_frame());
            }
            Err(e) => {
                warn!(error = %e, current_step = batch.current_step, "Skipping malformed history batch");
            }
        }
    }
}
