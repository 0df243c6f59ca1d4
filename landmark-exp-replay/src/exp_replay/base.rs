use super::{
    ready::ReadySignal,
    simulator::{Shared, Simulator},
    BatchSampler, ExpReplayConfig, ExpReplayParams, PlayerStats,
};
use crate::{
    util::{lock, read},
    RunControl,
};
use anyhow::Result;
use crossbeam_channel::{bounded, Receiver, Sender};
use landmark_core::{
    error::LandmarkError, record::Recorder, Env, Predictor, ReplayMemory,
};
use log::{info, warn};
use ndarray::ArrayD;
use rand::{rngs::StdRng, SeedableRng};
use std::{
    sync::{Arc, Mutex, RwLock},
    thread::JoinHandle,
};

/// Lifecycle of [`ExpReplay`].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ReplayState {
    /// The simulator has not been started.
    Uninitialized,

    /// The simulator is filling the agent memory.
    Filling,

    /// The agent memory is filled and batches are available.
    Running,
}

/// Experience replay for training a DQN agent, optionally with human demonstrations.
///
/// A simulator thread plays the environment epsilon-greedily with the current
/// predictor and appends transitions to the agent memory. Batches are drawn
/// with [`ExpReplay::batches`] from the agent memory, the human memory, or both,
/// depending on the update frequency.
pub struct ExpReplay<E: Env + Send + 'static> {
    config: ExpReplayConfig,

    /// Moved into the simulator on start.
    env: Option<(E, ArrayD<u8>)>,

    human_memory: Option<Arc<ReplayMemory>>,

    shared: Shared,

    ready: Arc<ReadySignal>,

    job_sender: Sender<()>,

    /// Moved into the simulator on start.
    job_receiver: Option<Receiver<()>>,

    handle: Option<JoinHandle<Result<()>>>,

    /// Number of created batch samplers, used to derive their seeds.
    n_samplers: u64,
}

impl<E: Env + Send + 'static> ExpReplay<E> {
    /// Builds the experience replay and resets the environment.
    ///
    /// `human_memory` must have the same state shape and history length as the
    /// agent memory.
    pub fn build(
        config: ExpReplayConfig,
        mut env: E,
        predictor: Box<dyn Predictor>,
        human_memory: Option<ReplayMemory>,
    ) -> Result<Self> {
        config.validate()?;
        let memory = ReplayMemory::build(&config.memory_config())?;

        if let Some(human) = human_memory.as_ref() {
            if human.state_shape() != memory.state_shape()
                || human.history_len() != memory.history_len()
            {
                return Err(LandmarkError::InvalidConfig(format!(
                    "human memory has state shape {:?} and history length {}, expected {:?} and {}",
                    human.state_shape(),
                    human.history_len(),
                    memory.state_shape(),
                    memory.history_len()
                ))
                .into());
            }
            info!("Human demonstration memory with {} transitions", human.len());
        }

        let obs = env.reset()?;
        info!("Number of Legal actions: {}", env.num_actions());

        let (job_sender, job_receiver) = bounded(config.job_queue_capacity);
        let shared = Shared {
            memory: Arc::new(RwLock::new(memory)),
            predictor: Arc::new(Mutex::new(predictor)),
            params: Arc::new(ExpReplayParams::new(
                config.init_exploration,
                config.update_frequency,
            )),
            stats: Arc::new(Mutex::new(PlayerStats::default())),
            control: RunControl::new(),
        };

        Ok(Self {
            config,
            env: Some((env, obs)),
            human_memory: human_memory.map(Arc::new),
            shared,
            ready: Arc::new(ReadySignal::default()),
            job_sender,
            job_receiver: Some(job_receiver),
            handle: None,
            n_samplers: 0,
        })
    }

    /// Spawns the simulator thread, which starts filling the agent memory.
    pub fn start(&mut self) -> Result<()> {
        let ((env, obs), jobs) = match (self.env.take(), self.job_receiver.take()) {
            (Some(env), Some(jobs)) => (env, jobs),
            _ => return Err(LandmarkError::InvalidState("already started".into()).into()),
        };

        let rng = StdRng::seed_from_u64(self.config.seed);
        let simulator = Simulator::new(env, obs, self.config.history_len, rng, self.shared.clone());
        let init_memory_size = self.config.init_memory_size;
        let ready = self.ready.clone();

        let handle = std::thread::Builder::new()
            .name("SimulatorThread".into())
            .spawn(move || simulator.run(init_memory_size, ready, jobs))?;
        self.handle = Some(handle);
        info!("Started simulator thread");
        Ok(())
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ReplayState {
        if self.job_receiver.is_some() {
            ReplayState::Uninitialized
        } else if self.ready.is_ready() {
            ReplayState::Running
        } else {
            ReplayState::Filling
        }
    }

    /// Blocks until the agent memory is filled.
    pub fn wait_ready(&self) -> Result<()> {
        if self.state() == ReplayState::Uninitialized {
            return Err(LandmarkError::InvalidState("simulator not started".into()).into());
        }
        self.ready.wait()
    }

    /// Returns a new sequence of batches.
    ///
    /// Fails if the simulator has not been started.
    pub fn batches(&mut self) -> Result<BatchSampler> {
        if self.state() == ReplayState::Uninitialized {
            return Err(LandmarkError::InvalidState("simulator not started".into()).into());
        }
        self.n_samplers += 1;
        let rng = StdRng::seed_from_u64(self.config.seed.wrapping_add(self.n_samplers));

        Ok(BatchSampler::new(
            self.shared.memory.clone(),
            self.human_memory.clone(),
            self.shared.params.clone(),
            self.ready.clone(),
            self.job_sender.clone(),
            self.config.batch_size,
            self.config.job_queue_capacity,
            rng,
        ))
    }

    /// Hyper-parameters adjustable during training.
    pub fn params(&self) -> Arc<ExpReplayParams> {
        self.shared.params.clone()
    }

    /// Handle to pause or stop the simulator.
    pub fn control(&self) -> RunControl {
        self.shared.control.clone()
    }

    /// Replaces the predictor used for greedy actions.
    pub fn set_predictor(&self, predictor: Box<dyn Predictor>) -> Result<()> {
        *lock(&self.shared.predictor)? = predictor;
        Ok(())
    }

    /// Number of transitions in the agent memory.
    pub fn agent_memory_len(&self) -> Result<usize> {
        Ok(read(&self.shared.memory)?.len())
    }

    /// Number of transitions in the human memory.
    pub fn human_memory_len(&self) -> Option<usize> {
        self.human_memory.as_ref().map(|m| m.len())
    }

    /// Writes the statistics of played episodes and resets them.
    ///
    /// Never fails, problems are logged.
    pub fn trigger<R: Recorder + ?Sized>(&self, opt_steps: usize, recorder: &mut R) {
        match lock(&self.shared.stats) {
            Ok(mut stats) => stats.trigger(opt_steps, recorder),
            Err(e) => warn!("Cannot log training scores: {}", e),
        }
    }

    /// Requests the simulator to stop.
    pub fn stop(&self) {
        self.shared.control.stop();
    }

    /// Waits for the simulator thread and returns its result.
    pub fn join(&mut self) -> Result<()> {
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| {
                LandmarkError::SimulatorStopped("simulator thread panicked".into())
            })?,
            None => Ok(()),
        }
    }

    /// Stops and joins the simulator.
    pub fn stop_and_join(&mut self) -> Result<()> {
        self.stop();
        self.join()
    }
}

impl<E: Env + Send + 'static> Drop for ExpReplay<E> {
    fn drop(&mut self) {
        if self.handle.is_some() {
            if let Err(e) = self.stop_and_join() {
                warn!("Simulator finished with error: {:?}", e);
            }
        }
    }
}
