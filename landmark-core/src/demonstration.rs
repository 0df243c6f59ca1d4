//! Filling a replay memory with recorded expert trajectories.
//!
//! Experts steer the agent through medical images by hand. Each session is
//! saved as a JSON log containing a list of [`EpisodeLog`]s. The logs only store
//! the locations of the agent, so [`load_demonstrations`] regenerates the
//! observations by positioning a [`DemoEnv`](crate::DemoEnv) at every recorded
//! location.
mod config;
mod episode;
mod loader;
pub use config::DemonstrationConfig;
pub use episode::EpisodeLog;
pub use loader::{load_demonstrations, DemonstrationStats};
