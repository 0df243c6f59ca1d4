//! Statistics of the episodes played by the simulator.
use landmark_core::{
    record::{Record, RecordValue::Scalar, Recorder},
    StatCounter, StepInfo,
};
use log::warn;

/// Per-episode statistics of the agent playing in the simulator.
#[derive(Debug, Default, Clone)]
pub struct PlayerStats {
    score: StatCounter,
    dist_error: StatCounter,
    n_games: usize,
    n_success: usize,
}

impl PlayerStats {
    /// Adds the final information of an episode.
    pub fn feed(&mut self, info: &StepInfo) {
        self.score.feed(info.score);
        self.dist_error.feed(info.dist_error);
        self.n_games += 1;
        if info.success {
            self.n_success += 1;
        }
    }

    /// Number of finished episodes.
    pub fn n_games(&self) -> usize {
        self.n_games
    }

    /// Number of episodes in which the agent reached the landmark.
    pub fn n_success(&self) -> usize {
        self.n_success
    }

    /// Builds a record of the statistics.
    ///
    /// Score and distance entries are left out with a warning if no episode
    /// has finished.
    pub fn record(&self, opt_steps: usize) -> Record {
        let mut record = Record::from_scalar("opt_steps", opt_steps as f32);

        match (
            self.score.average(),
            self.score.max(),
            self.dist_error.average(),
            self.dist_error.max(),
        ) {
            (Ok(mean_score), Ok(max_score), Ok(mean_dist), Ok(max_dist)) => {
                record.insert("expreplay/mean_score", Scalar(mean_score));
                record.insert("expreplay/max_score", Scalar(max_score));
                record.insert("expreplay/mean_dist", Scalar(mean_dist));
                record.insert("expreplay/max_dist", Scalar(max_dist));
            }
            _ => warn!("Cannot log training scores."),
        }

        let ratio = if self.n_games > 0 {
            self.n_success as f32 / self.n_games as f32
        } else {
            0.
        };
        record.insert("n_games", Scalar(self.n_games as f32));
        record.insert("n_success", Scalar(self.n_success as f32));
        record.insert("n_success_ratio", Scalar(ratio));
        record
    }

    /// Writes the statistics to `recorder` and resets them.
    pub fn trigger<R: Recorder + ?Sized>(&mut self, opt_steps: usize, recorder: &mut R) {
        recorder.write(self.record(opt_steps));
        self.reset();
    }

    /// Clears the statistics.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use landmark_core::record::BufferedRecorder;

    fn info(score: f32, dist_error: f32, success: bool) -> StepInfo {
        StepInfo {
            score,
            dist_error,
            success,
        }
    }

    #[test]
    fn test_trigger_writes_and_resets() {
        let mut stats = PlayerStats::default();
        stats.feed(&info(2.0, 0.0, true));
        stats.feed(&info(-1.0, 4.0, false));
        stats.feed(&info(5.0, 2.0, false));
        stats.feed(&info(2.0, 0.0, true));

        let mut recorder = BufferedRecorder::new();
        stats.trigger(1000, &mut recorder);
        let record = recorder.iter().next().unwrap();
        assert_eq!(record.get_scalar("opt_steps").unwrap(), 1000.);
        assert_eq!(record.get_scalar("expreplay/mean_score").unwrap(), 2.0);
        assert_eq!(record.get_scalar("expreplay/max_score").unwrap(), 5.0);
        assert_eq!(record.get_scalar("expreplay/mean_dist").unwrap(), 1.5);
        assert_eq!(record.get_scalar("expreplay/max_dist").unwrap(), 4.0);
        assert_eq!(record.get_scalar("n_games").unwrap(), 4.);
        assert_eq!(record.get_scalar("n_success").unwrap(), 2.);
        assert_eq!(record.get_scalar("n_success_ratio").unwrap(), 0.5);
        assert_eq!(stats.n_games(), 0);
    }

    #[test]
    fn test_empty_statistics_are_skipped() {
        let stats = PlayerStats::default();
        let record = stats.record(10);
        assert!(record.get("expreplay/mean_score").is_none());
        assert_eq!(record.get_scalar("n_games").unwrap(), 0.);
        assert_eq!(record.get_scalar("n_success_ratio").unwrap(), 0.);
    }
}
