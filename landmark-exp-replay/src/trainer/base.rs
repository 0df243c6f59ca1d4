use super::{Learner, TrainStat, TrainerConfig};
use crate::{ExpReplay, ExpReplayParams, ReplayState};
use anyhow::Result;
use landmark_core::{
    record::{RecordValue::Scalar, Recorder},
    Env, HyperParamSchedule,
};
use log::info;
use std::time::{Duration, Instant};

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages the training loop on batches of [`ExpReplay`].
///
/// # Training loop
///
/// 1. Start the simulator of [`ExpReplay`] if it is not running and hand it the
///    current network of the [`Learner`].
/// 2. For `opt_steps` in `0..max_opts`:
///     1. Set exploration and update frequency from their schedules at
///        `opt_steps`. Epoch-based schedules count `steps_per_epoch`
///        optimization steps per epoch.
///     2. Pull a batch, which lets the simulator play `update_frequency` steps.
///     3. Do an optimization step, `opt_steps += 1`.
///     4. If `opt_steps % sync_interval == 0`, hand the current network to the
///        simulator.
///     5. If `opt_steps % trigger_interval == 0`, write the statistics of played
///        episodes and the record of the learner with `"opt_steps"` and
///        `"opt_steps_per_sec"`.
///
/// ```mermaid
/// graph LR
///     T[Trainer]-->|schedules|P[ExpReplayParams]
///     E[ExpReplay]-->|TransitionBatch|L[Learner]
///     L-->|Predictor|E
///     L-->|Record|R[Recorder]
///     E-->|PlayerStats|R
/// ```
pub struct Trainer {
    /// The maximal number of optimization steps.
    max_opts: usize,

    /// Interval of writing statistics in optimization steps.
    trigger_interval: usize,

    /// Interval of synchronizing the predictor in optimization steps.
    sync_interval: usize,

    steps_per_epoch: usize,

    exploration_schedule: HyperParamSchedule,

    update_frequency_schedule: HyperParamSchedule,

    /// Optimization steps for computing optimization steps per second.
    opt_steps_for_ops: usize,

    /// Timer for computing optimization steps per second.
    timer_for_ops: Duration,
}

impl Trainer {
    /// Constructs a trainer.
    pub fn build(config: TrainerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            max_opts: config.max_opts,
            trigger_interval: config.trigger_interval,
            sync_interval: config.sync_interval,
            steps_per_epoch: config.steps_per_epoch,
            exploration_schedule: config.exploration_schedule,
            update_frequency_schedule: config.update_frequency_schedule,
            opt_steps_for_ops: 0,
            timer_for_ops: Duration::new(0, 0),
        })
    }

    /// Returns optimization steps per second, then resets the internal counter.
    fn opt_steps_per_sec(&mut self) -> f32 {
        let secs = self.timer_for_ops.as_secs_f32();
        let osps = if secs > 0. {
            self.opt_steps_for_ops as f32 / secs
        } else {
            0.
        };
        self.opt_steps_for_ops = 0;
        self.timer_for_ops = Duration::new(0, 0);
        osps
    }

    fn apply_schedules(&self, params: &ExpReplayParams, opt_steps: usize) {
        let exploration = self
            .exploration_schedule
            .value_at_opt_steps(opt_steps, self.steps_per_epoch);
        let update_frequency = self
            .update_frequency_schedule
            .value_at_opt_steps(opt_steps, self.steps_per_epoch)
            .round()
            .max(0.) as usize;

        if params.update_frequency() != update_frequency {
            info!(
                "Update frequency {} at opt_steps {}",
                update_frequency, opt_steps
            );
        }
        params.set_exploration(exploration);
        params.set_update_frequency(update_frequency);
    }

    /// Trains the learner.
    pub fn train<E, L, R>(
        &mut self,
        exp_replay: &mut ExpReplay<E>,
        learner: &mut L,
        recorder: &mut R,
    ) -> Result<TrainStat>
    where
        E: Env + Send + 'static,
        L: Learner,
        R: Recorder + ?Sized,
    {
        let params = exp_replay.params();
        self.apply_schedules(&params, 0);
        exp_replay.set_predictor(learner.predictor())?;
        if exp_replay.state() == ReplayState::Uninitialized {
            exp_replay.start()?;
        }
        let mut batches = exp_replay.batches()?;

        let time_total = Instant::now();
        let mut opt_steps = 0;

        while opt_steps < self.max_opts {
            self.apply_schedules(&params, opt_steps);
            let batch = batches.next_batch()?;

            let timer = Instant::now();
            let mut record = learner.opt(&batch)?;
            self.timer_for_ops += timer.elapsed();
            self.opt_steps_for_ops += 1;
            opt_steps += 1;

            if opt_steps % self.sync_interval == 0 {
                exp_replay.set_predictor(learner.predictor())?;
            }
            if opt_steps % self.trigger_interval == 0 {
                exp_replay.trigger(opt_steps, recorder);
                record.insert("opt_steps", Scalar(opt_steps as _));
                record.insert("opt_steps_per_sec", Scalar(self.opt_steps_per_sec()));
                recorder.write(record);
            }
        }

        let duration = time_total.elapsed();
        let secs = duration.as_secs_f32();
        Ok(TrainStat {
            opt_steps,
            duration,
            opt_per_sec: if secs > 0. { opt_steps as f32 / secs } else { 0. },
        })
    }
}
