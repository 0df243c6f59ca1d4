//! Infinite sequence of training batches.
use super::{
    phase::{MIXED_AGENT_SAMPLES, MIXED_HUMAN_SAMPLES},
    ready::ReadySignal,
    ExpReplayParams, SamplingPhase,
};
use crate::util::read;
use anyhow::Result;
use crossbeam_channel::Sender;
use landmark_core::{error::LandmarkError, ReplayMemory, Sample, TransitionBatch};
use log::info;
use rand::{rngs::StdRng, Rng};
use std::sync::{Arc, RwLock};

/// Draws `n` indices uniformly from `[low, high)`.
fn draw_indices(rng: &mut StdRng, low: usize, high: usize, n: usize) -> Result<Vec<usize>> {
    if low >= high {
        return Err(LandmarkError::EmptySampleRange { low, high }.into());
    }
    Ok((0..n).map(|_| rng.gen_range(low..high)).collect())
}

/// Upper bound (exclusive) of sample indices of a memory.
fn index_bound(memory: &ReplayMemory) -> usize {
    memory
        .len()
        .saturating_sub(memory.history_len() + 1)
}

/// Produces training batches from the agent and human memories.
///
/// Created by [`ExpReplay::batches`](crate::ExpReplay::batches). The first
/// batch is produced once the agent memory is filled. Every following pull
/// first hands one job token to the simulator, which then plays
/// `update_frequency` steps. The token blocks while the job queue is full, so
/// the consumer never runs far ahead of the simulator.
pub struct BatchSampler {
    agent_memory: Arc<RwLock<ReplayMemory>>,
    human_memory: Option<Arc<ReplayMemory>>,
    params: Arc<ExpReplayParams>,
    ready: Arc<ReadySignal>,
    jobs: Sender<()>,
    batch_size: usize,
    queue_capacity: usize,
    rng: StdRng,
    yielded: bool,
    phase: Option<SamplingPhase>,
}

impl BatchSampler {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        agent_memory: Arc<RwLock<ReplayMemory>>,
        human_memory: Option<Arc<ReplayMemory>>,
        params: Arc<ExpReplayParams>,
        ready: Arc<ReadySignal>,
        jobs: Sender<()>,
        batch_size: usize,
        queue_capacity: usize,
        rng: StdRng,
    ) -> Self {
        Self {
            agent_memory,
            human_memory,
            params,
            ready,
            jobs,
            batch_size,
            queue_capacity,
            rng,
            yielded: false,
            phase: None,
        }
    }

    /// Phase of the last produced batch.
    pub fn phase(&self) -> Option<SamplingPhase> {
        self.phase
    }

    fn sample_human(&mut self, n: usize) -> Result<Vec<Sample>> {
        let memory = self
            .human_memory
            .as_ref()
            .ok_or(LandmarkError::HumanMemoryRequired)?;
        let ixs = draw_indices(&mut self.rng, self.queue_capacity * 4, index_bound(memory), n)?;
        ixs.into_iter().map(|ix| memory.sample(ix)).collect()
    }

    fn sample_agent(&mut self, n: usize, update_frequency: usize) -> Result<Vec<Sample>> {
        let memory = read(&self.agent_memory)?;
        let ixs = draw_indices(
            &mut self.rng,
            self.queue_capacity * update_frequency,
            index_bound(&memory),
            n,
        )?;
        ixs.into_iter().map(|ix| memory.sample(ix)).collect()
    }

    /// Produces the next batch.
    pub fn next_batch(&mut self) -> Result<TransitionBatch> {
        if self.yielded {
            self.jobs.send(()).map_err(|_| {
                LandmarkError::SimulatorStopped("job queue disconnected".into())
            })?;
        } else {
            self.ready.wait()?;
        }

        let update_frequency = self.params.update_frequency();
        let phase = SamplingPhase::select(update_frequency, self.human_memory.is_some());
        if self.phase != Some(phase) {
            info!("{} ...", phase);
            self.phase = Some(phase);
        }

        let samples = match phase {
            SamplingPhase::Pretraining => self.sample_human(self.batch_size)?,
            SamplingPhase::Mixed => {
                let mut samples = self.sample_agent(MIXED_AGENT_SAMPLES, update_frequency)?;
                samples.extend(self.sample_human(MIXED_HUMAN_SAMPLES)?);
                samples
            }
            SamplingPhase::AgentOnly => self.sample_agent(self.batch_size, update_frequency)?,
        };

        let batch = TransitionBatch::from_samples(&samples)?;
        self.yielded = true;
        Ok(batch)
    }
}

impl Iterator for BatchSampler {
    type Item = Result<TransitionBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_batch())
    }
}
