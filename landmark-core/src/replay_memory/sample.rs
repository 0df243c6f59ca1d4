use ndarray::ArrayD;

/// A single environment step `(o_t, a_t, r_t, is_over_t)` as stored in the memory.
#[derive(Clone, Debug)]
pub struct Experience {
    /// Observation the action was taken in.
    pub state: ArrayD<u8>,

    /// Action.
    pub action: usize,

    /// Reward.
    pub reward: f32,

    /// The episode ended after this step.
    pub is_over: bool,

    /// The step was taken by a human expert.
    pub human: bool,
}

impl Experience {
    /// Constructs an [`Experience`].
    pub fn new(state: ArrayD<u8>, action: usize, reward: f32, is_over: bool, human: bool) -> Self {
        Self {
            state,
            action,
            reward,
            is_over,
            human,
        }
    }
}

/// A transition with stacked history frames, sampled from a replay memory.
#[derive(Clone, Debug)]
pub struct Sample {
    /// Frames of shape `state_shape + (history_len + 1,)`, oldest first.
    pub state: ArrayD<u8>,

    /// Action.
    pub action: usize,

    /// Reward.
    pub reward: f32,

    /// The episode ended after this transition.
    pub is_over: bool,

    /// The transition was taken by a human expert.
    pub human: bool,
}
