//! The thread playing the environment and filling the agent memory.
use super::{ready::ReadySignal, ExpReplayParams, PlayerStats};
use crate::{
    util::{lock, read, write},
    RunControl,
};
use anyhow::Result;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use landmark_core::{
    error::LandmarkError,
    util::{argmax, stack_history},
    Env, Experience, Predictor, ReplayMemory,
};
use log::{info, warn};
use ndarray::{ArrayD, Axis};
use rand::{rngs::StdRng, Rng};
use std::{
    sync::{Arc, Mutex, RwLock},
    time::Duration,
};

/// Interval at which a waiting simulator checks for cancellation.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Handles shared by the simulator and [`ExpReplay`](crate::ExpReplay).
#[derive(Clone)]
pub(crate) struct Shared {
    pub memory: Arc<RwLock<ReplayMemory>>,
    pub predictor: Arc<Mutex<Box<dyn Predictor>>>,
    pub params: Arc<ExpReplayParams>,
    pub stats: Arc<Mutex<PlayerStats>>,
    pub control: RunControl,
}

/// Plays the environment epsilon-greedily.
pub(crate) struct Simulator<E: Env> {
    env: E,
    current_obs: ArrayD<u8>,
    num_actions: usize,
    history_len: usize,
    rng: StdRng,
    shared: Shared,
}

impl<E: Env> Simulator<E> {
    pub fn new(env: E, current_obs: ArrayD<u8>, history_len: usize, rng: StdRng, shared: Shared) -> Self {
        let num_actions = env.num_actions();
        Self {
            env,
            current_obs,
            num_actions,
            history_len,
            rng,
            shared,
        }
    }

    /// Q-values of the current state, with its history.
    fn q_values(&mut self) -> Result<Vec<f32>> {
        let mut history = read(&self.shared.memory)?.recent_state();
        history.push(self.current_obs.clone());
        let state = stack_history(&history)?.insert_axis(Axis(0));

        let q = lock(&self.shared.predictor)?.predict(state.view())?;
        if q.nrows() != 1 || q.ncols() != self.num_actions {
            return Err(LandmarkError::InvalidState(format!(
                "predictor returned Q-values of shape {:?} for {} actions",
                q.shape(),
                self.num_actions
            ))
            .into());
        }
        Ok(q.row(0).to_vec())
    }

    /// Takes one epsilon-greedy step and appends the transition to the agent memory.
    ///
    /// When the episode ends, the observation returned by `reset` starts the next
    /// transition, rather than the last observation of the finished episode.
    pub fn populate(&mut self) -> Result<()> {
        let mem_len = read(&self.shared.memory)?.len();
        let explore = self.rng.gen::<f64>() <= self.shared.params.exploration()
            || mem_len <= self.history_len;

        let (act, q_values) = if explore {
            (
                self.rng.gen_range(0..self.num_actions),
                vec![0f32; self.num_actions],
            )
        } else {
            let q_values = self.q_values()?;
            (argmax(&q_values), q_values)
        };

        let step = self.env.step(act, &q_values)?;
        let next_obs = if step.is_over {
            lock(&self.shared.stats)?.feed(&step.info);
            self.env.reset()?
        } else {
            step.obs
        };

        let state = std::mem::replace(&mut self.current_obs, next_obs);
        write(&self.shared.memory)?.append(Experience::new(
            state,
            act,
            step.reward,
            step.is_over,
            false,
        ))
    }

    /// Populates the agent memory up to `init_memory_size` transitions.
    ///
    /// Returns `false` if stopped before.
    pub fn fill(&mut self, init_memory_size: usize) -> Result<bool> {
        info!(
            "Populating replay memory with epsilon={} ...",
            self.shared.params.exploration()
        );
        while read(&self.shared.memory)?.len() < init_memory_size {
            if !self.shared.control.checkpoint() {
                return Ok(false);
            }
            self.populate()?;
        }
        info!(
            "Replay memory populated with {} transitions",
            read(&self.shared.memory)?.len()
        );
        Ok(true)
    }

    /// Fills the memory, then plays `update_frequency` steps per received job token.
    fn run_loop(
        &mut self,
        init_memory_size: usize,
        ready: &ReadySignal,
        jobs: &Receiver<()>,
    ) -> Result<()> {
        if !self.fill(init_memory_size)? {
            return Ok(());
        }
        ready.set_ready();

        let control = self.shared.control.clone();
        while control.checkpoint() {
            match jobs.recv_timeout(POLL_INTERVAL) {
                Ok(()) => {
                    let update_frequency = self.shared.params.update_frequency();
                    for _ in 0..update_frequency {
                        if !control.checkpoint() {
                            return Ok(());
                        }
                        self.populate()?;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        Ok(())
    }

    /// Runs the simulator until stopped or failed.
    ///
    /// Consumes the job receiver, so batch producers observe the end of the
    /// simulator as a disconnected queue.
    pub fn run(mut self, init_memory_size: usize, ready: Arc<ReadySignal>, jobs: Receiver<()>) -> Result<()> {
        let result = self.run_loop(init_memory_size, &ready, &jobs);
        drop(jobs);
        match &result {
            Ok(()) => {
                ready.set_failed("simulator stopped");
                info!("Stopped simulator thread");
            }
            Err(e) => {
                ready.set_failed(e.to_string());
                warn!("Simulator thread failed: {:?}", e);
            }
        }
        result
    }
}
