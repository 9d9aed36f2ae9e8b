pub mod chart;
pub mod types;
pub mod window;

pub use chart::{ChartFrame, ChartSink, Series, TracingChart};
pub use telemetry_config::ChannelMode;
pub use types::*;
pub use window::{DisplayBuffer, MergeContext, MergeError, SlidingWindow};

/// Slots per display buffer: 10 seconds at 20 samples per second, inclusive.
pub const WINDOW_LEN: usize = 201;
/// Sample rate of the remote history, in samples per second.
pub const SAMPLE_RATE_HZ: f32 = 20.0;
/// Channels per metric in a history batch (relative x/y/z, absolute x/y/z).
pub const CHANNEL_COUNT: usize = 6;
/// Axes shown per chart.
pub const AXES: usize = 3;
