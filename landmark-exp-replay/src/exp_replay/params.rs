use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Hyper-parameters of [`ExpReplay`](crate::ExpReplay) adjustable during training.
///
/// Shared between the simulator thread, which reads them at every step, and
/// the training loop, which schedules them.
#[derive(Debug)]
pub struct ExpReplayParams {
    /// Bits of an `f64`.
    exploration: AtomicU64,

    update_frequency: AtomicUsize,
}

impl ExpReplayParams {
    /// Creates parameters.
    pub fn new(exploration: f64, update_frequency: usize) -> Self {
        Self {
            exploration: AtomicU64::new(exploration.to_bits()),
            update_frequency: AtomicUsize::new(update_frequency),
        }
    }

    /// Probability of a random action.
    pub fn exploration(&self) -> f64 {
        f64::from_bits(self.exploration.load(Ordering::Relaxed))
    }

    /// Sets the probability of a random action.
    pub fn set_exploration(&self, v: f64) {
        self.exploration.store(v.to_bits(), Ordering::Relaxed);
    }

    /// Number of simulator steps per consumed batch. 0 means pretraining on
    /// human demonstrations only.
    pub fn update_frequency(&self) -> usize {
        self.update_frequency.load(Ordering::Relaxed)
    }

    /// Sets the number of simulator steps per consumed batch.
    pub fn set_update_frequency(&self, v: usize) {
        self.update_frequency.store(v, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params() {
        let params = ExpReplayParams::new(1.0, 4);
        assert_eq!(params.exploration(), 1.0);
        params.set_exploration(0.1);
        params.set_update_frequency(0);
        assert_eq!(params.exploration(), 0.1);
        assert_eq!(params.update_frequency(), 0);
    }
}
