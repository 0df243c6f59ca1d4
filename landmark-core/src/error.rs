//! Errors in the library.
use std::path::PathBuf;
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug)]
pub enum LandmarkError {
    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),

    /// The shape of a state does not match the shape of the replay memory.
    #[error("State shape mismatch: expected {expected:?}, got {actual:?}")]
    StateShapeMismatch {
        /// Shape of the replay memory.
        expected: Vec<usize>,
        /// Shape of the given state.
        actual: Vec<usize>,
    },

    /// A sample index does not address a complete history window.
    #[error("Sample index {index} out of range (len = {len}, history_len = {history_len})")]
    SampleIndexOutOfRange {
        /// Logical index.
        index: usize,
        /// Number of transitions in the memory.
        len: usize,
        /// History length of the memory.
        history_len: usize,
    },

    /// The range for drawing sample indices is empty.
    #[error("Empty sampling range [{low}, {high}), the replay memory is not filled enough")]
    EmptySampleRange {
        /// Lower bound (inclusive).
        low: usize,
        /// Upper bound (exclusive).
        high: usize,
    },

    /// An action does not fit into the batch representation.
    #[error("Action {0} does not fit into i8")]
    ActionOutOfRange(usize),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The directory of demonstration logs does not exist.
    #[error(
        "Demonstration directory {0:?} not found; the expert logs are a private dataset \
         and must be reachable before training with human demonstrations"
    )]
    DemonstrationDirNotFound(PathBuf),

    /// A demonstration log could not be interpreted.
    #[error("Malformed demonstration log {path:?}: {reason}")]
    MalformedDemonstration {
        /// Path of the log file.
        path: PathBuf,
        /// Description of the problem.
        reason: String,
    },

    /// Sampling from the human memory was requested but no human memory exists.
    #[error("Pretraining phase requires a loaded human demonstration memory")]
    HumanMemoryRequired,

    /// Statistics were requested before any value was fed.
    #[error("No values in statistics counter")]
    EmptyStatistics,

    /// The simulator thread is not running anymore.
    #[error("Simulator stopped: {0}")]
    SimulatorStopped(String),

    /// The orchestrator was used in the wrong lifecycle state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Model, image and landmark files of a user-defined use case do not agree.
    #[error("Please use appropriate model, image, and landmarks: {0}")]
    InvalidUsecase(String),

    /// A lock was poisoned by a panicking thread.
    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}
