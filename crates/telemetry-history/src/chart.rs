use crate::types::Activity;
use crate::AXES;

pub const ACCELERATION_SERIES: [&str; AXES] = ["x", "y", "z"];
pub const DEVIATION_SERIES: [&str; AXES] = ["std_dev(x)", "std_dev(y)", "std_dev(z)"];

/// One named line on a chart, aligned to [`ChartFrame::labels`].
#[derive(Debug, Clone, Copy)]
pub struct Series<'a> {
    pub name: &'static str,
    pub data: &'a [Option<f32>],
}

impl Series<'_> {
    /// Newest sample, if the last slot holds one.
    pub fn latest(&self) -> Option<f32> {
        self.data.last().copied().flatten()
    }
}

/// Everything a chart needs to redraw.
#[derive(Debug, Clone, Copy)]
pub struct ChartFrame<'a> {
    /// Time axis in seconds, oldest first.
    pub labels: &'a [f32],
    /// Acceleration chart (m/s^2).
    pub acceleration: [Series<'a>; AXES],
    /// Standard deviation chart.
    pub deviation: [Series<'a>; AXES],
    pub activity: Activity,
}

impl<'a> ChartFrame<'a> {
    /// All six series, acceleration first.
    pub fn series(&self) -> impl Iterator<Item = &Series<'a>> {
        self.acceleration.iter().chain(self.deviation.iter())
    }
}

/// Destination for history redraws.
///
/// A redraw replaces whatever was shown before; calling it twice with the
/// same frame has no further effect.
pub trait ChartSink: Send {
    fn redraw(&mut self, frame: &ChartFrame<'_>);
}

/// Chart sink that reports through `tracing`.
///
/// Activity changes are logged at info; the newest value of every series is
/// logged at debug every `heartbeat` redraws.
pub struct TracingChart {
    heartbeat: u64,
    redraws: u64,
    activity: Option<Activity>,
}

impl TracingChart {
    pub fn new(heartbeat: u64) -> Self {
        Self {
            heartbeat: heartbeat.max(1),
            redraws: 0,
            activity: None,
        }
    }
}

impl ChartSink for TracingChart {
    fn redraw(&mut self, frame: &ChartFrame<'_>) {
        if self.activity != Some(frame.activity) {
            tracing::info!(activity = %frame.activity, "Activity changed");
            self.activity = Some(frame.activity);
        }

        self.redraws += 1;
        if self.redraws % self.heartbeat == 0 {
            let [x, y, z] = frame.acceleration.map(|s| s.latest());
            let [dx, dy, dz] = frame.deviation.map(|s| s.latest());
            tracing::debug!(
                redraws = self.redraws,
                ?x,
                ?y,
                ?z,
                ?dx,
                ?dy,
                ?dz,
                "History chart"
            );
        }
    }
}
