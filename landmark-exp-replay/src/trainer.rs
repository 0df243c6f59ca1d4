//! Training loop driving [`ExpReplay`](crate::ExpReplay).
mod base;
mod config;
mod learner;
mod stat;
pub use base::Trainer;
pub use config::TrainerConfig;
pub use learner::Learner;
pub use stat::TrainStat;

#[cfg(test)]
mod test {
    use super::*;
    use crate::{ExpReplay, ExpReplayConfig, SamplingPhase};
    use anyhow::Result;
    use landmark_core::{
        dummy::{ConstPredictor, DummyEnv},
        record::{BufferedRecorder, Record, RecordValue},
        Experience, HyperParamSchedule, Predictor, ReplayMemory, TransitionBatch,
    };
    use ndarray::{ArrayD, IxDyn};
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };
    use test_log::test;

    const SHAPE: [usize; 2] = [3, 3];

    /// Counts optimization steps and batch compositions.
    #[derive(Default)]
    struct CountingLearner {
        n_opts: usize,
        n_human: Vec<usize>,
        n_snapshots: Arc<AtomicUsize>,
    }

    impl Learner for CountingLearner {
        fn opt(&mut self, batch: &TransitionBatch) -> Result<Record> {
            self.n_opts += 1;
            self.n_human.push(batch.human.iter().filter(|&&h| h).count());
            Ok(Record::from_scalar("loss", 1.0 / self.n_opts as f32))
        }

        fn predictor(&self) -> Box<dyn Predictor> {
            self.n_snapshots.fetch_add(1, Ordering::SeqCst);
            Box::new(ConstPredictor::new(vec![0.; 6]))
        }
    }

    fn exp_replay_config() -> ExpReplayConfig {
        ExpReplayConfig::default()
            .batch_size(8)
            .memory_size(500)
            .init_memory_size(60)
            .history_len(4)
            .state_shape(SHAPE.to_vec())
            .seed(7)
    }

    fn human_memory(n: usize) -> Result<ReplayMemory> {
        let mut memory = ReplayMemory::new(1000, &SHAPE, 4)?;
        for i in 0..n {
            let state = ArrayD::from_elem(IxDyn(&SHAPE), (i % 100) as u8);
            memory.append(Experience::new(state, i % 6, 0.5, i % 8 == 7, true))?;
        }
        Ok(memory)
    }

    #[test]
    fn test_pretraining_then_mixed() -> Result<()> {
        let env = DummyEnv::new(&SHAPE).max_steps(6);
        let n_env_steps = env.step_counter();
        let mut exp_replay = ExpReplay::build(
            exp_replay_config(),
            env,
            Box::new(ConstPredictor::new(vec![0.; 6])),
            Some(human_memory(200)?),
        )?;
        let config = TrainerConfig::default()
            .max_opts(30)
            .trigger_interval(10)
            .sync_interval(5)
            .update_frequency_schedule(HyperParamSchedule::new(
                vec![(0, 0.), (20, 4.)],
                false,
                true,
            ));
        let mut learner = CountingLearner::default();
        let n_snapshots = learner.n_snapshots.clone();
        let mut recorder = BufferedRecorder::new();

        let mut trainer = Trainer::build(config)?;
        let stat = trainer.train(&mut exp_replay, &mut learner, &mut recorder)?;
        assert_eq!(stat.opt_steps, 30);
        assert_eq!(learner.n_opts, 30);

        // 20 human batches, then 10 mixed batches
        assert!(learner.n_human[..20].iter().all(|&n| n == 8));
        assert!(learner.n_human[20..].iter().all(|&n| n == 10));
        assert_eq!(exp_replay.params().update_frequency(), 4);

        // Initial snapshot and one per sync_interval
        assert_eq!(n_snapshots.load(Ordering::SeqCst), 1 + 6);

        // Played episode statistics and learner records at 10, 20, 30
        let learner_records = recorder
            .iter()
            .filter(|r| r.get("loss").is_some())
            .collect::<Vec<_>>();
        assert_eq!(learner_records.len(), 3);
        assert_eq!(learner_records[2].get_scalar("opt_steps")?, 30.0);
        assert!(learner_records[0].get("opt_steps_per_sec").is_some());
        assert_eq!(recorder.len(), 6);

        // Tokens of the mixed phase and at most a full queue of earlier ones
        // authorize 4 steps each
        exp_replay.stop_and_join()?;
        let n = n_env_steps.load(Ordering::SeqCst);
        assert!(n >= 60);
        assert!(n <= 60 + (10 + 6) * 4);
        Ok(())
    }

    #[test]
    fn test_agent_only_training() -> Result<()> {
        let mut exp_replay = ExpReplay::build(
            exp_replay_config(),
            DummyEnv::new(&SHAPE),
            Box::new(ConstPredictor::new(vec![0.; 6])),
            None,
        )?;
        let config = TrainerConfig::default()
            .max_opts(12)
            .trigger_interval(4)
            .exploration_schedule(HyperParamSchedule::new(
                vec![(0, 1.0), (10, 0.0)],
                true,
                true,
            ))
            .update_frequency_schedule(HyperParamSchedule::new(vec![(0, 2.)], false, true));
        let mut learner = CountingLearner::default();
        let mut recorder = BufferedRecorder::new();

        let mut trainer = Trainer::build(config)?;
        trainer.train(&mut exp_replay, &mut learner, &mut recorder)?;
        assert!(learner.n_human.iter().all(|&n| n == 0));
        assert_eq!(exp_replay.params().exploration(), 0.0);

        let mut batches = exp_replay.batches()?;
        batches.next_batch()?;
        assert_eq!(batches.phase(), Some(SamplingPhase::AgentOnly));
        assert!(recorder
            .iter()
            .any(|r| matches!(r.get("n_games"), Some(RecordValue::Scalar(_)))));
        Ok(())
    }
}
