use std::time::Duration;

/// Stats of [`Trainer::train`](crate::Trainer::train).
#[derive(Debug, Clone)]
pub struct TrainStat {
    /// The number of optimization steps done.
    pub opt_steps: usize,

    /// Duration of training.
    pub duration: Duration,

    /// The number of optimization steps per second.
    pub opt_per_sec: f32,
}

impl TrainStat {
    /// Returns a formatted string.
    pub fn fmt(&self) -> String {
        let mut s = "opt_steps, opt_steps/sec, duration\n".to_string();
        s += format!(
            "{}, {}, {}\n",
            self.opt_steps,
            self.opt_per_sec,
            self.duration.as_secs_f32()
        )
        .as_str();
        s
    }
}
