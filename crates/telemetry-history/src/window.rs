use crate::chart::{ChartFrame, Series, ACCELERATION_SERIES, DEVIATION_SERIES};
use crate::types::{Activity, HistoryBatch};
use crate::{AXES, CHANNEL_COUNT, SAMPLE_RATE_HZ, WINDOW_LEN};
use telemetry_config::ChannelMode;
use thiserror::Error;

/// Fixed-length FIFO of samples, oldest first.
///
/// Always holds exactly [`WINDOW_LEN`] slots. A slot with no sample is `None`;
/// gaps are never filled with zeros.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayBuffer {
    slots: Vec<Option<f32>>,
}

impl Default for DisplayBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl DisplayBuffer {
    pub fn empty() -> Self {
        Self {
            slots: vec![None; WINDOW_LEN],
        }
    }

    /// Buffer whose newest slots hold `values` (oldest first). Shorter input
    /// leaves leading empty slots; longer input keeps only the newest values.
    pub fn from_values(values: &[f32]) -> Self {
        let mut buffer = Self::empty();
        let take = values.len().min(WINDOW_LEN);
        buffer.shift_in(take, &values[values.len() - take..]);
        buffer
    }

    pub fn slots(&self) -> &[Option<f32>] {
        &self.slots
    }

    pub fn clear(&mut self) {
        self.slots.fill(None);
    }

    /// Drop the oldest `shift` slots and refill the tail with
    /// `shift - values.len()` empty slots followed by `values`.
    fn shift_in(&mut self, shift: usize, values: &[f32]) {
        debug_assert!(shift <= WINDOW_LEN);
        debug_assert!(values.len() <= shift);

        self.slots.rotate_left(shift);
        let tail = &mut self.slots[WINDOW_LEN - shift..];
        let gap = shift - values.len();
        tail[..gap].fill(None);
        for (slot, &value) in tail[gap..].iter_mut().zip(values) {
            *slot = Some(value);
        }
    }
}

/// Bookkeeping carried from one merge to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeContext {
    /// Step counter of the last merged batch.
    pub last_step: i64,
    /// Which half of the source channels feeds the display.
    pub mode: ChannelMode,
}

impl MergeContext {
    pub fn new(mode: ChannelMode) -> Self {
        Self { last_step: 0, mode }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MergeError {
    #[error("{metric} has {found} channels, expected 6")]
    ChannelCount { metric: &'static str, found: usize },
    #[error("{metric}[{channel}] has {found} samples, expected {expected}")]
    RaggedChannel {
        metric: &'static str,
        channel: usize,
        expected: usize,
        found: usize,
    },
    #[error("negative step counter {0}")]
    NegativeStep(i64),
}

impl HistoryBatch {
    /// Check the batch shape and return the common channel length.
    pub fn validate(&self) -> Result<usize, MergeError> {
        let len = self.acc.first().map_or(0, Vec::len);
        for (metric, channels) in [("acc", &self.acc), ("dev", &self.dev)] {
            if channels.len() != CHANNEL_COUNT {
                return Err(MergeError::ChannelCount {
                    metric,
                    found: channels.len(),
                });
            }
            if let Some((channel, c)) = channels.iter().enumerate().find(|(_, c)| c.len() != len) {
                return Err(MergeError::RaggedChannel {
                    metric,
                    channel,
                    expected: len,
                    found: c.len(),
                });
            }
        }
        if self.current_step < 0 {
            return Err(MergeError::NegativeStep(self.current_step));
        }
        Ok(len)
    }
}

/// The six on-screen history buffers plus the fixed time axis they align to.
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    labels: Vec<f32>,
    acceleration: [DisplayBuffer; AXES],
    deviation: [DisplayBuffer; AXES],
    activity: Activity,
}

impl Default for SlidingWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl SlidingWindow {
    pub fn new() -> Self {
        Self {
            labels: time_axis(),
            acceleration: Default::default(),
            deviation: Default::default(),
            activity: Activity::None,
        }
    }

    /// Seconds relative to the newest sample: `-10.0, -9.95, ..., 0.0`.
    pub fn labels(&self) -> &[f32] {
        &self.labels
    }

    pub fn acceleration(&self) -> &[DisplayBuffer; AXES] {
        &self.acceleration
    }

    pub fn deviation(&self) -> &[DisplayBuffer; AXES] {
        &self.deviation
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    fn buffers_mut(&mut self) -> impl Iterator<Item = &mut DisplayBuffer> {
        self.acceleration.iter_mut().chain(self.deviation.iter_mut())
    }

    /// Fold `batch` into the buffers and return the context for the next merge.
    ///
    /// The buffers advance by the number of steps elapsed since
    /// `ctx.last_step`, capped at [`WINDOW_LEN`]. Steps the batch no longer
    /// covers become empty slots ahead of the batch's newest values, so a slow
    /// poll shows up as a gap instead of misaligned data. A step counter that
    /// went backwards means the remote restarted: the buffers are cleared and
    /// counting resumes from zero.
    ///
    /// A malformed batch is rejected before anything is touched.
    pub fn merge(
        &mut self,
        batch: &HistoryBatch,
        ctx: MergeContext,
    ) -> Result<MergeContext, MergeError> {
        let len = batch.validate()?;

        let mut last_step = ctx.last_step;
        if batch.current_step < last_step {
            tracing::info!(
                last_step,
                current_step = batch.current_step,
                "Remote step counter reset, clearing history"
            );
            self.buffers_mut().for_each(DisplayBuffer::clear);
            last_step = 0;
        }

        let elapsed = batch.current_step - last_step;
        let shift = elapsed.min(WINDOW_LEN as i64) as usize;
        let fresh = shift.min(len);
        if shift > fresh {
            tracing::debug!(elapsed, len, gap = shift - fresh, "History gap");
        }

        let source = ctx.mode.channel_offset();
        for axis in 0..AXES {
            let acc = &batch.acc[source + axis];
            let dev = &batch.dev[source + axis];
            self.acceleration[axis].shift_in(shift, &acc[len - fresh..]);
            self.deviation[axis].shift_in(shift, &dev[len - fresh..]);
        }
        self.activity = batch.activity;

        Ok(MergeContext {
            last_step: batch.current_step,
            mode: ctx.mode,
        })
    }

    /// Snapshot for the chart sink.
    pub fn chart_frame(&self) -> ChartFrame<'_> {
        ChartFrame {
            labels: &self.labels,
            acceleration: series(&ACCELERATION_SERIES, &self.acceleration),
            deviation: series(&DEVIATION_SERIES, &self.deviation),
            activity: self.activity,
        }
    }
}

fn series<'a>(
    names: &[&'static str; AXES],
    buffers: &'a [DisplayBuffer; AXES],
) -> [Series<'a>; AXES] {
    std::array::from_fn(|i| Series {
        name: names[i],
        data: buffers[i].slots(),
    })
}

fn time_axis() -> Vec<f32> {
    let newest = (WINDOW_LEN - 1) as f32;
    (0..WINDOW_LEN)
        .map(|i| -(newest - i as f32) / SAMPLE_RATE_HZ)
        .collect()
}
