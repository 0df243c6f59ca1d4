#![warn(missing_docs)]
//! Core components for training anatomical landmark detection agents.
//!
//! * [`ReplayMemory`] is a fixed-capacity ring buffer of transitions with
//!   history-windowed sampling.
//! * [`demonstration`] fills a [`ReplayMemory`] from recorded expert trajectories.
//! * [`Env`], [`DemoEnv`] and [`Predictor`] are the interfaces of the
//!   collaborators (medical image environment, Q-network).
//! * [`record`] provides the statistics sink used during training.
pub mod demonstration;
pub mod dummy;
pub mod error;
pub mod record;
pub mod util;

mod base;
pub use base::{BrowseEnv, DemoEnv, Env, Predictor, Step, StepInfo};

mod replay_memory;
pub use replay_memory::{
    Experience, ReplayMemory, ReplayMemoryConfig, Sample, TransitionBatch,
};

mod schedule;
pub use schedule::HyperParamSchedule;

mod stat;
pub use stat::StatCounter;

mod usecase;
pub use usecase::{Usecase, UsecasePaths};
