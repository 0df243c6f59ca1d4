//! Interfaces of the collaborators.
mod env;
mod predictor;
mod step;
pub use env::{BrowseEnv, DemoEnv, Env};
pub use predictor::Predictor;
pub use step::{Step, StepInfo};
