use thiserror::Error;

/// Failure of the output hardware
#[derive(Debug, Error)]
pub enum OutputError {
    /// Hardware detection found no usable device
    #[error("hardware unavailable: {0}")]
    Unavailable(String),
    #[error("driver write failed: {0}")]
    Write(String),
}

/// Rejection of an externally supplied effect
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("effect info has no name")]
    MissingName,
    /// The trial tick panicked or produced a buffer of the wrong length
    #[error("effect `{0}` does not produce a valid frame")]
    MissingTick(String),
    #[error("cannot replace built-in effect `{0}`")]
    Builtin(String),
    #[error("loader rejected the source: {0}")]
    Loader(String),
}

/// Failure to read or write persisted state
#[derive(Debug, Error)]
pub enum StateError {
    #[error("state I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("state is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Output(#[from] OutputError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    State(#[from] StateError),
    #[error("failed to spawn thread: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
