//! Environment.
use super::Step;
use anyhow::Result;
use ndarray::ArrayD;

/// Represents a medical image environment in which an agent searches a landmark.
///
/// Observations are 8-bit volumes (or images) of a fixed shape around the
/// current location of the agent.
pub trait Env {
    /// Resets the environment and returns the first observation of a new episode.
    fn reset(&mut self) -> Result<ArrayD<u8>>;

    /// Performs an environment step.
    ///
    /// `q_values` are the action values the action was chosen with. They are all
    /// zero when the action was taken at random.
    fn step(&mut self, act: usize, q_values: &[f32]) -> Result<Step>;

    /// The number of legal discrete actions.
    fn num_actions(&self) -> usize;

    /// The number of image files the environment iterates over.
    fn num_files(&self) -> usize {
        1
    }
}

/// An environment which can be positioned at an arbitrary location.
///
/// This capability is only used to regenerate observations of recorded
/// expert trajectories.
pub trait DemoEnv: Env {
    /// Moves the agent to `location` at the given resolution.
    fn seek_to_location(&mut self, location: [i32; 3], resolution: f32) -> Result<()>;

    /// Returns the observation at the current location.
    fn current_observation(&self) -> ArrayD<u8>;
}

/// An environment moved by hand, at one of several image resolutions.
///
/// Scales are integers, 1 being the finest resolution.
pub trait BrowseEnv: DemoEnv {
    /// Moves the view with a manual action and returns the new observation.
    ///
    /// Manual moves do not end episodes.
    fn manual_step(&mut self, act: usize) -> Result<ArrayD<u8>>;

    /// Current scale.
    fn scale(&self) -> u32;

    /// Switches to the next finer (`higher_res`) or coarser scale.
    fn adjust_scale(&mut self, higher_res: bool) -> Result<()>;
}
