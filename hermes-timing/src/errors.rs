use snafu::Snafu;

pub use crate::errors::Error::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Timing error: {source}.
    TimingError { source: TimingError },
    /// Target error: {info}.
    TargetError { info: String },
}

impl From<TimingError> for Error {
    fn from(value: TimingError) -> Self {
        Self::TimingError { source: value }
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum TimingError {
    /// Player is already playing
    AlreadyPlaying,
    /// Player already belongs to a composite player
    AlreadyOwned,
    /// Invalid duration ({duration}ms) - a duration must be a finite, non-negative number
    InvalidDuration { duration: f64 },
    /// Invalid keyframe offset ({offset}) - offsets must be ordered and within [0, 1]
    InvalidKeyframeOffset { offset: f64 },
    /// Player is not attached to a playing timeline
    DetachedPlayer,
}
