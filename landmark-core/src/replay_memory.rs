//! Ring buffer of transitions with history-windowed sampling.
//!
//! A [`ReplayMemory`] stores single-frame transitions in parallel arrays.
//! Sampling a logical index returns a [`Sample`] whose state stacks
//! `history_len + 1` consecutive frames along the last axis: the first
//! `history_len` frames are the state the action was taken in, the last
//! `history_len` frames are the next state. Frames belonging to a previous
//! episode are zero-filled.
//!
//! ```rust
//! use landmark_core::{Experience, ReplayMemory, ReplayMemoryConfig};
//! use ndarray::ArrayD;
//!
//! let config = ReplayMemoryConfig::default()
//!     .capacity(100)
//!     .state_shape(vec![2, 2])
//!     .history_len(4);
//! let mut memory = ReplayMemory::build(&config).unwrap();
//!
//! for i in 0..10u8 {
//!     let state = ArrayD::from_elem(vec![2, 2], i);
//!     memory.append(Experience::new(state, 1, 0.5, false, false)).unwrap();
//! }
//!
//! let sample = memory.sample(0).unwrap();
//! assert_eq!(sample.state.shape(), &[2, 2, 5]);
//! ```
mod base;
mod batch;
mod config;
mod sample;
pub use base::ReplayMemory;
pub use batch::TransitionBatch;
pub use config::ReplayMemoryConfig;
pub use sample::{Experience, Sample};
