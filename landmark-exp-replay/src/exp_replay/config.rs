//! Configuration of [`ExpReplay`](crate::ExpReplay).
use anyhow::Result;
use landmark_core::{error::LandmarkError, ReplayMemoryConfig};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`ExpReplay`](crate::ExpReplay).
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ExpReplayConfig {
    /// Number of transitions in a batch.
    pub batch_size: usize,

    /// Capacity of the agent memory.
    pub memory_size: usize,

    /// Number of transitions collected before the first batch.
    pub init_memory_size: usize,

    /// Initial probability of a random action.
    pub init_exploration: f64,

    /// Initial number of simulator steps per consumed batch.
    pub update_frequency: usize,

    /// Number of stacked frames.
    pub history_len: usize,

    /// Shape of a single observation.
    pub state_shape: Vec<usize>,

    /// Capacity of the job queue between batch consumer and simulator.
    pub job_queue_capacity: usize,

    /// Seed of the random number generators.
    pub seed: u64,
}

impl Default for ExpReplayConfig {
    fn default() -> Self {
        Self {
            batch_size: 48,
            memory_size: 100_000,
            init_memory_size: 5_000,
            init_exploration: 1.0,
            update_frequency: 4,
            history_len: 4,
            state_shape: vec![45, 45, 45],
            job_queue_capacity: 5,
            seed: 42,
        }
    }
}

impl ExpReplayConfig {
    /// Sets the batch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Sets the capacity of the agent memory.
    pub fn memory_size(mut self, v: usize) -> Self {
        self.memory_size = v;
        self
    }

    /// Sets the number of transitions collected before the first batch.
    pub fn init_memory_size(mut self, v: usize) -> Self {
        self.init_memory_size = v;
        self
    }

    /// Sets the initial exploration rate.
    pub fn init_exploration(mut self, v: f64) -> Self {
        self.init_exploration = v;
        self
    }

    /// Sets the initial update frequency.
    pub fn update_frequency(mut self, v: usize) -> Self {
        self.update_frequency = v;
        self
    }

    /// Sets the history length.
    pub fn history_len(mut self, v: usize) -> Self {
        self.history_len = v;
        self
    }

    /// Sets the shape of a single observation.
    pub fn state_shape(mut self, v: Vec<usize>) -> Self {
        self.state_shape = v;
        self
    }

    /// Sets the capacity of the job queue.
    pub fn job_queue_capacity(mut self, v: usize) -> Self {
        self.job_queue_capacity = v;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Configuration of the agent memory.
    pub fn memory_config(&self) -> ReplayMemoryConfig {
        ReplayMemoryConfig::default()
            .capacity(self.memory_size)
            .state_shape(self.state_shape.clone())
            .history_len(self.history_len)
    }

    /// Checks the configuration.
    pub fn validate(&self) -> Result<()> {
        self.memory_config().validate()?;
        let invalid = |msg: &str| -> Result<()> {
            Err(LandmarkError::InvalidConfig(msg.to_string()).into())
        };
        if self.batch_size == 0 {
            return invalid("batch_size must be positive");
        }
        if self.job_queue_capacity == 0 {
            return invalid("job_queue_capacity must be positive");
        }
        if self.init_memory_size > self.memory_size {
            return invalid("init_memory_size exceeds memory_size");
        }
        if !(0.0..=1.0).contains(&self.init_exploration) {
            return invalid("init_exploration must be in [0, 1]");
        }
        Ok(())
    }

    /// Constructs [`ExpReplayConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`ExpReplayConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_exp_replay_config() -> Result<()> {
        let config = ExpReplayConfig::default()
            .batch_size(32)
            .init_memory_size(100)
            .seed(7);

        let dir = TempDir::new("exp_replay_config")?;
        let path = dir.path().join("exp_replay_config.yaml");
        config.save(&path)?;
        let config_ = ExpReplayConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }

    #[test]
    fn test_validate() {
        assert!(ExpReplayConfig::default().validate().is_ok());
        assert!(ExpReplayConfig::default().batch_size(0).validate().is_err());
        assert!(ExpReplayConfig::default().history_len(0).validate().is_err());
        assert!(ExpReplayConfig::default()
            .memory_size(100)
            .init_memory_size(101)
            .validate()
            .is_err());
        assert!(ExpReplayConfig::default()
            .state_shape(vec![])
            .validate()
            .is_err());
    }
}
