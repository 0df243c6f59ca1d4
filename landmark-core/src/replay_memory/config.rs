//! Configuration of [`ReplayMemory`](super::ReplayMemory).
use crate::error::LandmarkError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`ReplayMemory`](super::ReplayMemory).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct ReplayMemoryConfig {
    /// The maximum number of transitions.
    pub capacity: usize,

    /// Shape of a single observation.
    pub state_shape: Vec<usize>,

    /// The number of frames the network sees.
    pub history_len: usize,
}

impl Default for ReplayMemoryConfig {
    fn default() -> Self {
        Self {
            capacity: 100_000,
            state_shape: vec![45, 45, 45],
            history_len: 4,
        }
    }
}

impl ReplayMemoryConfig {
    /// Sets the capacity of the replay memory.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the shape of a single observation.
    pub fn state_shape(mut self, state_shape: Vec<usize>) -> Self {
        self.state_shape = state_shape;
        self
    }

    /// Sets the history length.
    pub fn history_len(mut self, history_len: usize) -> Self {
        self.history_len = history_len;
        self
    }

    /// Checks that the configuration describes a usable memory.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(LandmarkError::InvalidConfig("capacity must be positive".into()).into());
        }
        if self.history_len == 0 {
            return Err(
                LandmarkError::InvalidConfig("history_len must be positive".into()).into(),
            );
        }
        if self.state_shape.is_empty() || self.state_shape.iter().any(|&d| d == 0) {
            return Err(LandmarkError::InvalidConfig(format!(
                "invalid state shape {:?}",
                self.state_shape
            ))
            .into());
        }
        Ok(())
    }

    /// Constructs [`ReplayMemoryConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`ReplayMemoryConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
