use serde::{Deserialize, Serialize};

/// An expert trajectory on a single image.
///
/// The per-step vectors have equal lengths. Step `k` records the location the
/// expert was at, and the action, reward and termination flag that led there.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EpisodeLog {
    /// Image name without directory and extension.
    pub img_name: String,

    /// Agent locations.
    pub states: Vec<[i32; 3]>,

    /// Actions.
    pub actions: Vec<usize>,

    /// Rewards.
    pub rewards: Vec<f32>,

    /// Episode end flags.
    pub is_over: Vec<bool>,

    /// Resolutions of the observation at each location.
    pub resolution: Vec<f32>,
}

impl EpisodeLog {
    /// Checks that all per-step vectors have the same length.
    pub fn check_lengths(&self) -> Result<(), String> {
        let n = self.states.len();
        let lens = [
            ("actions", self.actions.len()),
            ("rewards", self.rewards.len()),
            ("is_over", self.is_over.len()),
            ("resolution", self.resolution.len()),
        ];
        match lens.iter().find(|(_, l)| *l != n) {
            Some((name, l)) => Err(format!(
                "episode on {}: {} states but {} {}",
                self.img_name, n, l, name
            )),
            None => Ok(()),
        }
    }
}
