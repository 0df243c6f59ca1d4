//! Configuration of [`Session`](super::Session).
use crate::Speed;
use anyhow::Result;
use landmark_core::Usecase;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// What an agent does in a session.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
pub enum Task {
    /// Searches landmarks without ground truth.
    Play,

    /// Searches landmarks and reports the distance to the ground truth.
    Evaluation,
}

/// Configuration of [`Session`](super::Session).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct SessionConfig {
    /// Task of the agent.
    pub task: Task,

    /// Use case of model and images.
    pub usecase: Usecase,

    /// Number of stacked frames the model sees.
    pub history_len: usize,

    /// Initial pace of the agent.
    pub speed: Speed,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            task: Task::Play,
            usecase: Usecase::BrainMri,
            history_len: 4,
            speed: Speed::Fast,
        }
    }
}

impl SessionConfig {
    /// Sets the task.
    pub fn task(mut self, v: Task) -> Self {
        self.task = v;
        self
    }

    /// Sets the use case.
    pub fn usecase(mut self, v: Usecase) -> Self {
        self.usecase = v;
        self
    }

    /// Sets the history length.
    pub fn history_len(mut self, v: usize) -> Self {
        self.history_len = v;
        self
    }

    /// Sets the initial speed.
    pub fn speed(mut self, v: Speed) -> Self {
        self.speed = v;
        self
    }

    /// Constructs [`SessionConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`SessionConfig`] as YAML file.
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
    fn test_serde_session_config() -> Result<()> {
        let config = SessionConfig::default()
            .task(Task::Evaluation)
            .usecase(Usecase::CardiacMri)
            .speed(Speed::Slow);

        let dir = TempDir::new("session_config")?;
        let path = dir.path().join("session_config.yaml");
        config.save(&path)?;
        let config_ = SessionConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }
}
