use thiserror::Error;

/// Misuse of the runner, or a task that could not produce a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunnerError {
    /// Parallel execution was requested without a worker bootstrap.
    #[error("parallel execution requires a worker bootstrap; register one with `with_bootstrap`")]
    MissingBootstrap,

    #[error("unknown operation \"{operation}\"")]
    UnknownOperation { operation: String },

    #[error("task key \"{key}\" is already queued")]
    DuplicateKey { key: String },

    #[error("task \"{key}\" panicked: {message}")]
    TaskPanicked { key: String, message: String },

    #[error("failed to spawn worker thread: {message}")]
    Spawn { message: String },
}

pub type Result<T> = std::result::Result<T, RunnerError>;
