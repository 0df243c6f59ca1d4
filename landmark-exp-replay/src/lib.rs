//! Experience replay with human demonstrations for landmark detection agents.
//!
//! * [`ExpReplay`] runs a simulator thread playing the environment and
//!   produces training batches with [`ExpReplay::batches`]. A bounded job queue
//!   keeps the simulator and the batch consumer in lockstep.
//! * [`Trainer`] drives a [`Learner`] on these batches and schedules the
//!   exploration rate and the update frequency.
//! * [`Session`] plays a trained agent in automatic mode, with pause, resume,
//!   terminate and speed control through [`RunControl`].
//!
//! # Sampling phases
//! * Pretraining (`update_frequency == 0`) - batches from human demonstrations only.
//! * Mixed - 38 agent and 10 human transitions per batch.
//! * Agent only - when no human memory is given.
mod control;
mod exp_replay;
mod session;
mod trainer;
mod util;
pub use control::{RunControl, Speed};
pub use exp_replay::{
    BatchSampler, ExpReplay, ExpReplayConfig, ExpReplayParams, PlayerStats, ReplayState,
    SamplingPhase, MIXED_AGENT_SAMPLES, MIXED_HUMAN_SAMPLES,
};
pub use session::{
    Browse, BrowseAction, Session, SessionConfig, SessionEvent, SessionState, Task, MAX_SCALE,
    MIN_SCALE,
};
pub use trainer::{Learner, TrainStat, Trainer, TrainerConfig};
pub use util::train_with_tensorboard;
