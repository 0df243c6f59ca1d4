use anyhow::Result;
use landmark_core::{record::Record, Predictor, TransitionBatch};

/// The network trained on batches of [`ExpReplay`](crate::ExpReplay).
///
/// Network definition and the optimization maths live in the implementor.
pub trait Learner {
    /// Performs an optimization step on a batch and returns training statistics,
    /// e.g. the loss.
    fn opt(&mut self, batch: &TransitionBatch) -> Result<Record>;

    /// Returns a snapshot of the current network for selecting actions.
    fn predictor(&self) -> Box<dyn Predictor>;
}
