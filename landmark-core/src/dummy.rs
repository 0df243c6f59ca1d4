//! This module is used for tests.
//!
//! [`DummyEnv`] is a grid world in which the agent moves one voxel per step
//! towards a fixed target. Its observations are constant frames whose value
//! encodes the location, so tests can identify where a frame was taken.
use crate::{BrowseEnv, DemoEnv, Env, Predictor, Step, StepInfo};
use anyhow::{bail, Result};
use ndarray::{Array2, ArrayD, ArrayViewD, IxDyn};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

/// Moves along `+x`, `-x`, `+y`, `-y`, `+z`, `-z`.
const MOVES: [[i32; 3]; 6] = [
    [1, 0, 0],
    [-1, 0, 0],
    [0, 1, 0],
    [0, -1, 0],
    [0, 0, 1],
    [0, 0, -1],
];

/// Dummy environment.
pub struct DummyEnv {
    obs_shape: Vec<usize>,
    start: [i32; 3],
    target: [i32; 3],
    location: [i32; 3],
    max_steps: usize,
    num_files: usize,
    episode_steps: usize,
    score: f32,
    scale: u32,
    n_steps: Arc<AtomicUsize>,
}

impl DummyEnv {
    /// Creates an environment with observations of the given shape.
    pub fn new(obs_shape: &[usize]) -> Self {
        Self {
            obs_shape: obs_shape.to_vec(),
            start: [0, 0, 0],
            target: [3, 2, 1],
            location: [0, 0, 0],
            max_steps: 20,
            num_files: 1,
            episode_steps: 0,
            score: 0.,
            scale: 3,
            n_steps: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Sets the target landmark.
    pub fn target(mut self, target: [i32; 3]) -> Self {
        self.target = target;
        self
    }

    /// Sets the maximum number of steps of an episode.
    pub fn max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Sets the number of image files.
    pub fn files(mut self, num_files: usize) -> Self {
        self.num_files = num_files;
        self
    }

    /// Counter of steps taken, shared with clones of the handle.
    pub fn step_counter(&self) -> Arc<AtomicUsize> {
        self.n_steps.clone()
    }

    /// Value of the frames observed at `location`.
    pub fn frame_value(location: [i32; 3]) -> u8 {
        (location[0] * 16 + location[1] * 4 + location[2]).rem_euclid(256) as u8
    }

    fn dist(&self) -> f32 {
        let d = (0..3)
            .map(|i| ((self.location[i] - self.target[i]) as f32).powi(2))
            .sum::<f32>();
        d.sqrt()
    }

    fn obs(&self) -> ArrayD<u8> {
        ArrayD::from_elem(IxDyn(&self.obs_shape), Self::frame_value(self.location))
    }
}

impl Env for DummyEnv {
    fn reset(&mut self) -> Result<ArrayD<u8>> {
        self.location = self.start;
        self.episode_steps = 0;
        self.score = 0.;
        Ok(self.obs())
    }

    fn step(&mut self, act: usize, _q_values: &[f32]) -> Result<Step> {
        if act >= MOVES.len() {
            bail!("Invalid action {}", act);
        }
        let d0 = self.dist();
        for i in 0..3 {
            self.location[i] += MOVES[act][i];
        }
        let d1 = self.dist();
        let reward = (d0 - d1).clamp(-1., 1.);

        self.episode_steps += 1;
        self.score += reward;
        self.n_steps.fetch_add(1, Ordering::SeqCst);

        let success = d1 == 0.;
        let is_over = success || self.episode_steps >= self.max_steps;
        let info = StepInfo {
            score: self.score,
            dist_error: d1,
            success,
        };
        Ok(Step::new(self.obs(), reward, is_over, info))
    }

    fn num_actions(&self) -> usize {
        MOVES.len()
    }

    fn num_files(&self) -> usize {
        self.num_files
    }
}

impl DemoEnv for DummyEnv {
    fn seek_to_location(&mut self, location: [i32; 3], _resolution: f32) -> Result<()> {
        self.location = location;
        Ok(())
    }

    fn current_observation(&self) -> ArrayD<u8> {
        self.obs()
    }
}

/// Manual moves span `scale` voxels. The scale starts at the coarsest
/// value 3.
impl BrowseEnv for DummyEnv {
    fn manual_step(&mut self, act: usize) -> Result<ArrayD<u8>> {
        if act >= MOVES.len() {
            bail!("Invalid action {}", act);
        }
        for i in 0..3 {
            self.location[i] += MOVES[act][i] * self.scale as i32;
        }
        Ok(self.obs())
    }

    fn scale(&self) -> u32 {
        self.scale
    }

    fn adjust_scale(&mut self, higher_res: bool) -> Result<()> {
        self.scale = if higher_res {
            self.scale.saturating_sub(1).max(1)
        } else {
            (self.scale + 1).min(3)
        };
        Ok(())
    }
}

/// Returns the same action values for every state.
pub struct ConstPredictor {
    q_values: Vec<f32>,
    n_calls: Arc<AtomicUsize>,
}

impl ConstPredictor {
    /// Creates a predictor returning `q_values`.
    pub fn new(q_values: Vec<f32>) -> Self {
        Self {
            q_values,
            n_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Counter of calls to [`Predictor::predict`].
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        self.n_calls.clone()
    }
}

impl Predictor for ConstPredictor {
    fn predict(&mut self, states: ArrayViewD<u8>) -> Result<Array2<f32>> {
        self.n_calls.fetch_add(1, Ordering::SeqCst);
        let n = states.shape().first().copied().unwrap_or(0);
        let q = &self.q_values;
        Ok(Array2::from_shape_fn((n, q.len()), |(_, j)| q[j]))
    }
}
