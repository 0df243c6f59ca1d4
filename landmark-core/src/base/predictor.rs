//! Predictor.
use anyhow::Result;
use ndarray::{Array2, ArrayViewD};

/// Computes action values from a batch of stacked states.
///
/// The input has shape `(batch, *state_shape, history_len)`. The output has
/// shape `(batch, num_actions)`.
pub trait Predictor: Send {
    /// Returns Q-values for every state in the batch.
    fn predict(&mut self, states: ArrayViewD<u8>) -> Result<Array2<f32>>;
}

impl<P: Predictor + ?Sized> Predictor for Box<P> {
    fn predict(&mut self, states: ArrayViewD<u8>) -> Result<Array2<f32>> {
        (**self).predict(states)
    }
}
