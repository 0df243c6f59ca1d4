//! A batch of sampled transitions.
use super::Sample;
use crate::error::LandmarkError;
use anyhow::Result;
use ndarray::{stack, Array1, ArrayD, ArrayViewD, Axis, Slice};
use std::convert::TryFrom;

/// A batch of transitions, stacked along the first axis.
///
/// `state` has shape `(n, *state_shape, history_len + 1)`. The first
/// `history_len` frames of the last axis are the state, the last
/// `history_len` frames are the next state.
#[derive(Clone, Debug)]
pub struct TransitionBatch {
    /// Stacked frames.
    pub state: ArrayD<u8>,

    /// Actions.
    pub action: Array1<i8>,

    /// Rewards.
    pub reward: Array1<f32>,

    /// Episode end flags.
    pub is_over: Array1<bool>,

    /// Human expert flags.
    pub human: Array1<bool>,
}

impl TransitionBatch {
    /// Stacks samples into a batch.
    pub fn from_samples(samples: &[Sample]) -> Result<Self> {
        let views = samples.iter().map(|s| s.state.view()).collect::<Vec<_>>();
        let state = stack(Axis(0), &views)?;
        let action = samples
            .iter()
            .map(|s| i8::try_from(s.action).map_err(|_| LandmarkError::ActionOutOfRange(s.action)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            state,
            action: Array1::from(action),
            reward: samples.iter().map(|s| s.reward).collect(),
            is_over: samples.iter().map(|s| s.is_over).collect(),
            human: samples.iter().map(|s| s.human).collect(),
        })
    }

    /// Returns the number of transitions.
    pub fn len(&self) -> usize {
        self.action.len()
    }

    /// Returns `true` if the batch has no transitions.
    pub fn is_empty(&self) -> bool {
        self.action.is_empty()
    }

    /// Returns the history length.
    pub fn history_len(&self) -> usize {
        self.state.shape().last().map_or(0, |k| k.saturating_sub(1))
    }

    /// Frames the actions were taken in, `(n, *state_shape, history_len)`.
    pub fn current_state(&self) -> ArrayViewD<u8> {
        let last = Axis(self.state.ndim() - 1);
        self.state
            .slice_axis(last, Slice::from(0..self.history_len()))
    }

    /// Frames after the actions, `(n, *state_shape, history_len)`.
    pub fn next_state(&self) -> ArrayViewD<u8> {
        let last = Axis(self.state.ndim() - 1);
        self.state.slice_axis(last, Slice::from(1..))
    }

    /// Returns all items.
    pub fn unpack(
        self,
    ) -> (
        ArrayD<u8>,
        Array1<i8>,
        Array1<f32>,
        Array1<bool>,
        Array1<bool>,
    ) {
        (self.state, self.action, self.reward, self.is_over, self.human)
    }
}
