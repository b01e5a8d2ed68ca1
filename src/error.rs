use thiserror::Error;

/// Errors raised while resolving schedules or preparing trajectory data.
///
/// All of them are configuration errors: the same input always fails the
/// same way, so none is worth retrying.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("unsupported beta schedule: {0}")]
    UnsupportedSchedule(String),

    #[error("malformed parameters in beta schedule `{name}`: {reason}")]
    MalformedParameter { name: String, reason: String },

    #[error("the number of diffusion steps must be at least 1")]
    InvalidStepCount,

    #[error("time lag {tau} is out of range for trajectories of {timesteps} timesteps")]
    InvalidLag { tau: usize, timesteps: usize },
}

pub type Result<T> = core::result::Result<T, Error>;
