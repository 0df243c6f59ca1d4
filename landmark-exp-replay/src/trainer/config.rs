use anyhow::Result;
use landmark_core::{error::LandmarkError, HyperParamSchedule};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Trainer`](crate::Trainer).
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct TrainerConfig {
    /// The maximum number of optimization steps.
    pub max_opts: usize,

    /// Interval of writing statistics in optimization steps.
    pub trigger_interval: usize,

    /// Interval of handing the current network to the simulator in optimization steps.
    pub sync_interval: usize,

    /// Optimization steps in an epoch, the unit of epoch-based schedules.
    pub steps_per_epoch: usize,

    /// Schedule of the exploration rate.
    pub exploration_schedule: HyperParamSchedule,

    /// Schedule of the update frequency.
    pub update_frequency_schedule: HyperParamSchedule,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            max_opts: 25_000_000,
            trigger_interval: 25_000,
            sync_interval: 100,
            steps_per_epoch: 25_000,
            exploration_schedule: HyperParamSchedule::exploration(),
            update_frequency_schedule: HyperParamSchedule::update_frequency(),
        }
    }
}

impl TrainerConfig {
    /// Sets the number of optimization steps.
    pub fn max_opts(mut self, v: usize) -> Self {
        self.max_opts = v;
        self
    }

    /// Sets the interval of writing statistics.
    pub fn trigger_interval(mut self, v: usize) -> Self {
        self.trigger_interval = v;
        self
    }

    /// Sets the interval of synchronizing the predictor.
    pub fn sync_interval(mut self, v: usize) -> Self {
        self.sync_interval = v;
        self
    }

    /// Sets the number of optimization steps per epoch.
    pub fn steps_per_epoch(mut self, v: usize) -> Self {
        self.steps_per_epoch = v;
        self
    }

    /// Sets the schedule of the exploration rate.
    pub fn exploration_schedule(mut self, v: HyperParamSchedule) -> Self {
        self.exploration_schedule = v;
        self
    }

    /// Sets the schedule of the update frequency.
    pub fn update_frequency_schedule(mut self, v: HyperParamSchedule) -> Self {
        self.update_frequency_schedule = v;
        self
    }

    /// Checks intervals and schedules.
    pub fn validate(&self) -> Result<()> {
        let check = |ok: bool, msg: &str| -> Result<()> {
            if ok {
                Ok(())
            } else {
                Err(LandmarkError::InvalidConfig(msg.to_string()).into())
            }
        };
        check(self.trigger_interval > 0, "trigger_interval must be positive")?;
        check(self.sync_interval > 0, "sync_interval must be positive")?;
        check(self.steps_per_epoch > 0, "steps_per_epoch must be positive")?;
        check(
            !self.exploration_schedule.points.is_empty(),
            "exploration_schedule has no points",
        )?;
        check(
            !self.update_frequency_schedule.points.is_empty(),
            "update_frequency_schedule has no points",
        )?;
        check(
            self.update_frequency_schedule.points.iter().all(|p| p.1 >= 0.),
            "update frequencies must not be negative",
        )
    }

    /// Constructs [`TrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrainerConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
