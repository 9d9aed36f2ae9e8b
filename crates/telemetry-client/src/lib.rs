//! Polling clients for the remote telemetry service.
//!
//! Two independent loops run as tokio tasks: the orientation loop fetches
//! samples back to back and hands each one to a [`SampleSink`], the history
//! loop fetches a batch on a fixed cadence, merges it into a
//! [`SlidingWindow`](telemetry_history::SlidingWindow) and redraws the chart.
//! Failed fetches are retried after an exponential [`Backoff`].

pub mod backoff;
pub mod poll;
pub mod source;

pub use backoff::Backoff;
pub use poll::{
    run_orientation_loop, HistoryLoop, HistoryState, LoopExit, PollTask, SampleSink, Shutdown,
    SinkClosed,
};
pub use source::{build_http_client, Fetch, FetchError, JsonEndpoint};
