use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Remote telemetry endpoints and polling cadence.
    pub service: ServiceConfig,
    /// Retry policy for failed fetches.
    pub backoff: BackoffConfig,
    /// Fixed scene camera.
    pub camera: CameraConfig,
    /// Initial window size.
    pub window: WindowConfig,
    /// History chart settings.
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Endpoint returning `{ "rot": [pitch, yaw] }`.
    pub orientation_url: String,
    /// Endpoint returning the acceleration history batch.
    pub history_url: String,
    /// Delay between a finished history redraw and the next fetch.
    pub history_interval_ms: u64,
    /// Per-request timeout. A fetch that takes longer counts as failed.
    pub request_timeout_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            orientation_url: "http://192.168.100.33/data".into(),
            history_url: "http://192.168.100.33/history".into(),
            history_interval_ms: 100,
            request_timeout_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffConfig {
    /// First retry delay after a failure.
    pub initial_ms: u64,
    /// Upper bound on the retry delay.
    pub max_ms: u64,
    /// Growth factor applied after each consecutive failure.
    pub multiplier: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_ms: 250,
            max_ms: 5000,
            multiplier: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Eye position in world space.
    pub position: [f32; 3],
    /// Point the camera looks at.
    pub center: [f32; 3],
    /// World up direction.
    pub up: [f32; 3],
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.8, 2.5],
            center: [0.0, 0.0, 0.0],
            up: [0.0, 1.0, 0.0],
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("camera near plane must be positive, got {0}")]
    NearPlane(f32),
    #[error("camera far plane {far} must lie beyond near plane {near}")]
    FarPlane { near: f32, far: f32 },
    #[error("camera field of view must be within (0, 180) degrees, got {0}")]
    FieldOfView(f32),
    #[error("camera position and center coincide")]
    DegenerateView,
    #[error("camera up vector is parallel to the view direction")]
    ParallelUp,
}

impl CameraConfig {
    /// Reject parameters that would make the view or projection degenerate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.near.is_nan() || self.near <= 0.0 {
            return Err(ConfigError::NearPlane(self.near));
        }
        if self.far.is_nan() || self.far <= self.near {
            return Err(ConfigError::FarPlane {
                near: self.near,
                far: self.far,
            });
        }
        if self.fov_y_degrees.is_nan() || self.fov_y_degrees <= 0.0 || self.fov_y_degrees >= 180.0 {
            return Err(ConfigError::FieldOfView(self.fov_y_degrees));
        }

        let forward = [
            self.position[0] - self.center[0],
            self.position[1] - self.center[1],
            self.position[2] - self.center[2],
        ];
        let forward_len2 = forward.iter().map(|c| c * c).sum::<f32>();
        if forward_len2 <= f32::EPSILON {
            return Err(ConfigError::DegenerateView);
        }

        let up = self.up;
        let cross = [
            up[1] * forward[2] - up[2] * forward[1],
            up[2] * forward[0] - up[0] * forward[2],
            up[0] * forward[1] - up[1] * forward[0],
        ];
        let up_len2 = up.iter().map(|c| c * c).sum::<f32>();
        let cross_len2 = cross.iter().map(|c| c * c).sum::<f32>();
        // |up x forward|^2 = |up|^2 |forward|^2 sin^2
        if cross_len2 <= 1e-8 * up_len2 * forward_len2 {
            return Err(ConfigError::ParallelUp);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Channel set shown when the dashboard starts.
    pub initial_mode: ChannelMode,
    /// Log the chart's newest values every this many redraws.
    pub log_every: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            initial_mode: ChannelMode::Relative,
            log_every: 50,
        }
    }
}

/// Which half of the six history channels the charts display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChannelMode {
    /// Channels 0-2: relative x/y/z.
    #[default]
    Relative,
    /// Channels 3-5: absolute x/y/z.
    Absolute,
}

impl ChannelMode {
    /// Index of the first source channel for this mode.
    pub fn channel_offset(self) -> usize {
        match self {
            ChannelMode::Relative => 0,
            ChannelMode::Absolute => 3,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ChannelMode::Relative => ChannelMode::Absolute,
            ChannelMode::Absolute => ChannelMode::Relative,
        }
    }
}
