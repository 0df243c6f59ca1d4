//! Environment step.
use ndarray::ArrayD;

/// Information reported by the environment at every step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepInfo {
    /// Accumulated reward of the current episode.
    pub score: f32,

    /// Distance between the agent and the target landmark.
    pub dist_error: f32,

    /// Whether the agent reached the landmark.
    pub success: bool,
}

/// Represents an observation, reward and termination flag `(o_t+1, r_t, is_over_t)`
/// with some additional information.
#[derive(Clone, Debug)]
pub struct Step {
    /// Observation after the step.
    pub obs: ArrayD<u8>,

    /// Reward.
    pub reward: f32,

    /// Flag denoting if the episode is over.
    pub is_over: bool,

    /// Information of the environment.
    pub info: StepInfo,
}

impl Step {
    /// Constructs a [`Step`] object.
    pub fn new(obs: ArrayD<u8>, reward: f32, is_over: bool, info: StepInfo) -> Self {
        Self {
            obs,
            reward,
            is_over,
            info,
        }
    }
}
