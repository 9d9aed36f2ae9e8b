use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// One channel of samples, oldest first.
pub type Channel = Vec<f32>;

/// A history snapshot as served by the remote `/history` endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistoryBatch {
    /// Acceleration per channel (m/s^2).
    pub acc: Vec<Channel>,
    /// Standard deviation of acceleration per channel.
    pub dev: Vec<Channel>,
    /// Step counter of the newest sample in the batch.
    pub current_step: i64,
    /// Activity the remote classifier currently reports.
    pub activity: Activity,
}

/// Activity reported alongside a history batch. Encoded as `0 | 1 | 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "u8")]
pub enum Activity {
    #[default]
    None,
    Walking,
    Jumping,
}

#[derive(Debug, Error)]
#[error("unknown activity code {0}")]
pub struct UnknownActivity(pub u8);

impl TryFrom<u8> for Activity {
    type Error = UnknownActivity;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Activity::None),
            1 => Ok(Activity::Walking),
            2 => Ok(Activity::Jumping),
            other => Err(UnknownActivity(other)),
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Activity::None => "None",
            Activity::Walking => "Walking",
            Activity::Jumping => "Jumping",
        })
    }
}
