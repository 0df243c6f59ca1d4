//! Ring buffer storing transitions in parallel arrays.
use super::{Experience, ReplayMemoryConfig, Sample, TransitionBatch};
use crate::{error::LandmarkError, util::move_first_axis_last};
use anyhow::Result;
use ndarray::{ArrayD, IxDyn};
use std::collections::VecDeque;

/// A fixed-capacity circular store of transitions.
///
/// Once full, every append overwrites the oldest slot. The memory also keeps
/// the most recent `history_len - 1` non-terminal states, which form the
/// history the agent acts on together with its current observation.
pub struct ReplayMemory {
    /// Maximum number of transitions that can be stored.
    capacity: usize,

    /// Shape of a single observation.
    state_shape: Vec<usize>,

    /// Number of elements of a single observation.
    frame_len: usize,

    /// Number of stacked frames the network sees.
    history_len: usize,

    /// Current insertion index.
    i: usize,

    /// Current number of stored transitions.
    size: usize,

    /// Observations, `capacity * frame_len` elements.
    state: Vec<u8>,

    action: Vec<usize>,

    reward: Vec<f32>,

    is_over: Vec<bool>,

    human: Vec<bool>,

    /// Most recent non-terminal states, cleared at episode ends.
    hist: VecDeque<ArrayD<u8>>,
}

impl ReplayMemory {
    /// Builds an empty replay memory.
    pub fn build(config: &ReplayMemoryConfig) -> Result<Self> {
        config.validate()?;
        let capacity = config.capacity;
        let frame_len = config.state_shape.iter().product();

        Ok(Self {
            capacity,
            state_shape: config.state_shape.clone(),
            frame_len,
            history_len: config.history_len,
            i: 0,
            size: 0,
            state: vec![0; capacity * frame_len],
            action: vec![0; capacity],
            reward: vec![0.; capacity],
            is_over: vec![false; capacity],
            human: vec![false; capacity],
            hist: VecDeque::with_capacity(config.history_len),
        })
    }

    /// Builds an empty replay memory from its parameters.
    pub fn new(capacity: usize, state_shape: &[usize], history_len: usize) -> Result<Self> {
        let config = ReplayMemoryConfig::default()
            .capacity(capacity)
            .state_shape(state_shape.to_vec())
            .history_len(history_len);
        Self::build(&config)
    }

    /// Appends a transition at the write cursor.
    pub fn append(&mut self, exp: Experience) -> Result<()> {
        if exp.state.shape() != self.state_shape.as_slice() {
            return Err(LandmarkError::StateShapeMismatch {
                expected: self.state_shape.clone(),
                actual: exp.state.shape().to_vec(),
            }
            .into());
        }

        let offset = self.i * self.frame_len;
        let dst = &mut self.state[offset..offset + self.frame_len];
        match exp.state.as_slice() {
            Some(src) => dst.copy_from_slice(src),
            None => dst
                .iter_mut()
                .zip(exp.state.iter())
                .for_each(|(d, s)| *d = *s),
        }
        self.action[self.i] = exp.action;
        self.reward[self.i] = exp.reward;
        self.is_over[self.i] = exp.is_over;
        self.human[self.i] = exp.human;

        self.i = (self.i + 1) % self.capacity;
        if self.size < self.capacity {
            self.size += 1;
        }

        if exp.is_over {
            self.hist.clear();
        } else if self.history_len > 1 {
            self.hist.push_back(exp.state);
            if self.hist.len() > self.history_len - 1 {
                self.hist.pop_front();
            }
        }

        Ok(())
    }

    /// Returns `history_len - 1` most recent states of the current episode, oldest first.
    ///
    /// Missing states are zero frames placed before the retained ones.
    pub fn recent_state(&self) -> Vec<ArrayD<u8>> {
        let n = self.history_len - 1;
        let mut states = (0..n - self.hist.len())
            .map(|_| ArrayD::zeros(IxDyn(&self.state_shape)))
            .collect::<Vec<_>>();
        states.extend(self.hist.iter().cloned());
        states
    }

    /// Samples the transition window starting at logical index `index`.
    ///
    /// Index 0 is the oldest transition in the memory. The window covers
    /// `history_len + 1` slots, so `index` must be smaller than
    /// `len() - history_len - 1`.
    pub fn sample(&self, index: usize) -> Result<Sample> {
        let k = self.history_len + 1;
        if index + k >= self.size {
            return Err(LandmarkError::SampleIndexOutOfRange {
                index,
                len: self.size,
                history_len: self.history_len,
            }
            .into());
        }

        let start = (self.i + index) % self.size;
        let slots = (0..k).map(|j| (start + j) % self.size).collect::<Vec<_>>();

        let fl = self.frame_len;
        let mut frames = Vec::with_capacity(k * fl);
        for &s in slots.iter() {
            frames.extend_from_slice(&self.state[s * fl..(s + 1) * fl]);
        }

        // Frames up to the end of a previous episode are not part of the history
        for j in (0..self.history_len.saturating_sub(1)).rev() {
            if self.is_over[slots[j]] {
                frames[..(j + 1) * fl].iter_mut().for_each(|v| *v = 0);
                break;
            }
        }

        let mut shape = Vec::with_capacity(self.state_shape.len() + 1);
        shape.push(k);
        shape.extend_from_slice(&self.state_shape);
        let stacked = ArrayD::from_shape_vec(IxDyn(&shape), frames)?;

        let current = slots[self.history_len - 1];
        Ok(Sample {
            state: move_first_axis_last(stacked),
            action: self.action[current],
            reward: self.reward[current],
            is_over: self.is_over[current],
            human: self.human[current],
        })
    }

    /// Samples the windows at the given logical indices and stacks them into a batch.
    pub fn sample_batch(&self, ixs: &[usize]) -> Result<TransitionBatch> {
        let samples = ixs
            .iter()
            .map(|&ix| self.sample(ix))
            .collect::<Result<Vec<_>>>()?;
        TransitionBatch::from_samples(&samples)
    }

    /// Returns the current number of transitions.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if no transition has been appended.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the history length.
    pub fn history_len(&self) -> usize {
        self.history_len
    }

    /// Returns the shape of a single observation.
    pub fn state_shape(&self) -> &[usize] {
        &self.state_shape
    }

    /// Returns the number of transitions ending an episode.
    pub fn num_terminal_flags(&self) -> usize {
        self.is_over[..self.size].iter().filter(|&&f| f).count()
    }

    /// Returns the number of transitions taken by a human expert.
    pub fn num_human_flags(&self) -> usize {
        self.human[..self.size].iter().filter(|&&f| f).count()
    }
}
