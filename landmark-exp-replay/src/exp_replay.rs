//! Experience replay fed by a simulator thread.
//!
//! ```mermaid
//! graph LR
//!     S[Simulator thread]-->|append|A[Agent memory]
//!     A-->|sample|B[BatchSampler]
//!     H[Human memory]-->|sample|B
//!     B-->|job token|Q[Job queue]
//!     Q-->|update_frequency steps|S
//! ```
//!
//! The job queue is bounded, so a batch consumer cannot get more than
//! `job_queue_capacity + 1` batches ahead of the simulator.
mod base;
mod config;
mod params;
mod phase;
mod ready;
mod sampler;
mod simulator;
mod stat;
pub use base::{ExpReplay, ReplayState};
pub use config::ExpReplayConfig;
pub use params::ExpReplayParams;
pub use phase::{SamplingPhase, MIXED_AGENT_SAMPLES, MIXED_HUMAN_SAMPLES};
pub use sampler::BatchSampler;
pub use stat::PlayerStats;

#[cfg(test)]
mod test {
    use super::*;
    use anyhow::{bail, Result};
    use landmark_core::{
        dummy::{ConstPredictor, DummyEnv},
        error::LandmarkError,
        record::BufferedRecorder,
        Env, Experience, ReplayMemory, Step,
    };
    use ndarray::{ArrayD, IxDyn};
    use std::{
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
        thread,
        time::{Duration, Instant},
    };
    use test_log::test;

    const SHAPE: [usize; 2] = [3, 3];

    fn config() -> ExpReplayConfig {
        ExpReplayConfig::default()
            .batch_size(8)
            .memory_size(200)
            .init_memory_size(60)
            .update_frequency(4)
            .history_len(4)
            .state_shape(SHAPE.to_vec())
            .job_queue_capacity(5)
            .seed(1)
    }

    fn env() -> DummyEnv {
        DummyEnv::new(&SHAPE).max_steps(7)
    }

    fn predictor() -> Box<ConstPredictor> {
        Box::new(ConstPredictor::new(vec![0.; 6]))
    }

    fn human_memory(n: usize) -> Result<ReplayMemory> {
        let mut memory = ReplayMemory::new(1000, &SHAPE, 4)?;
        for i in 0..n {
            let state = ArrayD::from_elem(IxDyn(&SHAPE), (i % 200) as u8);
            memory.append(Experience::new(state, i % 6, 1.0, i % 10 == 9, true))?;
        }
        Ok(memory)
    }

    /// Polls `f` until it returns `true` or the timeout expires.
    fn wait_until(timeout: Duration, f: impl Fn() -> bool) -> bool {
        let t = Instant::now();
        while t.elapsed() < timeout {
            if f() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        f()
    }

    #[test]
    fn test_lifecycle() -> Result<()> {
        let mut exp_replay = ExpReplay::build(config(), env(), predictor(), None)?;
        assert_eq!(exp_replay.state(), ReplayState::Uninitialized);
        assert!(exp_replay.batches().is_err());

        exp_replay.start()?;
        exp_replay.wait_ready()?;
        assert_eq!(exp_replay.state(), ReplayState::Running);
        assert_eq!(exp_replay.agent_memory_len()?, 60);

        let err = exp_replay.start().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LandmarkError>(),
            Some(LandmarkError::InvalidState(_))
        ));
        exp_replay.stop_and_join()
    }

    #[test]
    fn test_agent_only_batches() -> Result<()> {
        let mut exp_replay = ExpReplay::build(config(), env(), predictor(), None)?;
        exp_replay.start()?;
        let mut batches = exp_replay.batches()?;

        for _ in 0..3 {
            let batch = batches.next().unwrap()?;
            assert_eq!(batch.state.shape(), &[8, 3, 3, 5]);
            assert_eq!(batch.action.len(), 8);
            assert!(batch.action.iter().all(|&a| (0..6).contains(&a)));
            assert!(batch.human.iter().all(|&h| !h));
        }
        assert_eq!(batches.phase(), Some(SamplingPhase::AgentOnly));
        exp_replay.stop_and_join()
    }

    #[test]
    fn test_pretraining_batches() -> Result<()> {
        let config = config().update_frequency(0);
        let mut exp_replay =
            ExpReplay::build(config, env(), predictor(), Some(human_memory(100)?))?;
        exp_replay.start()?;
        let mut batches = exp_replay.batches()?;

        for _ in 0..3 {
            let batch = batches.next().unwrap()?;
            assert_eq!(batch.state.shape(), &[8, 3, 3, 5]);
            assert!(batch.human.iter().all(|&h| h));
        }
        assert_eq!(batches.phase(), Some(SamplingPhase::Pretraining));

        // The simulator plays no steps while pretraining
        assert_eq!(exp_replay.agent_memory_len()?, 60);
        exp_replay.stop_and_join()
    }

    #[test]
    fn test_mixed_batches() -> Result<()> {
        let config = config().batch_size(48);
        let mut exp_replay =
            ExpReplay::build(config, env(), predictor(), Some(human_memory(100)?))?;
        exp_replay.start()?;
        let mut batches = exp_replay.batches()?;

        for _ in 0..3 {
            let batch = batches.next().unwrap()?;
            assert_eq!(batch.len(), MIXED_AGENT_SAMPLES + MIXED_HUMAN_SAMPLES);
            assert_eq!(batch.state.shape(), &[48, 3, 3, 5]);
            let human = batch.human.to_vec();
            assert!(human[..MIXED_AGENT_SAMPLES].iter().all(|&h| !h));
            assert!(human[MIXED_AGENT_SAMPLES..].iter().all(|&h| h));
        }
        assert_eq!(batches.phase(), Some(SamplingPhase::Mixed));
        exp_replay.stop_and_join()
    }

    #[test]
    fn test_phase_follows_update_frequency() -> Result<()> {
        let mut exp_replay =
            ExpReplay::build(config().update_frequency(0), env(), predictor(), Some(human_memory(100)?))?;
        exp_replay.start()?;
        let mut batches = exp_replay.batches()?;

        batches.next_batch()?;
        assert_eq!(batches.phase(), Some(SamplingPhase::Pretraining));
        exp_replay.params().set_update_frequency(4);
        batches.next_batch()?;
        assert_eq!(batches.phase(), Some(SamplingPhase::Mixed));
        exp_replay.stop_and_join()
    }

    #[test]
    fn test_pretraining_requires_human_memory() -> Result<()> {
        let config = config().update_frequency(0);
        let mut exp_replay = ExpReplay::build(config, env(), predictor(), None)?;
        exp_replay.start()?;

        let err = exp_replay.batches()?.next().unwrap().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LandmarkError>(),
            Some(LandmarkError::HumanMemoryRequired)
        ));
        exp_replay.stop_and_join()
    }

    #[test]
    fn test_human_memory_shape_is_checked() -> Result<()> {
        let human = ReplayMemory::new(100, &[4, 4], 4)?;
        assert!(ExpReplay::build(config(), env(), predictor(), Some(human)).is_err());
        Ok(())
    }

    #[test]
    fn test_simulator_plays_update_frequency_steps_per_batch() -> Result<()> {
        let env = env();
        let n_steps = env.step_counter();
        let mut exp_replay = ExpReplay::build(config(), env, predictor(), None)?;
        exp_replay.start()?;
        let mut batches = exp_replay.batches()?;

        for _ in 0..5 {
            batches.next_batch()?;
        }

        // Tokens are handed over for the first 4 batches
        let expected = 60 + 4 * 4;
        assert!(wait_until(Duration::from_secs(5), || {
            n_steps.load(Ordering::SeqCst) == expected
        }));
        thread::sleep(Duration::from_millis(100));
        assert_eq!(n_steps.load(Ordering::SeqCst), expected);
        exp_replay.stop_and_join()
    }

    #[test]
    fn test_consumer_blocks_on_full_job_queue() -> Result<()> {
        let mut exp_replay = ExpReplay::build(config(), env(), predictor(), None)?;
        exp_replay.start()?;
        exp_replay.wait_ready()?;

        // Let the simulator reach its pause gate
        let control = exp_replay.control();
        control.pause();
        thread::sleep(Duration::from_millis(150));

        let n_batches = Arc::new(AtomicUsize::new(0));
        let consumer = {
            let mut batches = exp_replay.batches()?;
            let n_batches = n_batches.clone();
            thread::spawn(move || -> Result<()> {
                loop {
                    batches.next_batch()?;
                    n_batches.fetch_add(1, Ordering::SeqCst);
                }
            })
        };

        // First batch without token, then one per free slot of the queue
        assert!(wait_until(Duration::from_secs(5), || {
            n_batches.load(Ordering::SeqCst) == 6
        }));
        thread::sleep(Duration::from_millis(100));
        assert_eq!(n_batches.load(Ordering::SeqCst), 6);

        control.resume();
        assert!(wait_until(Duration::from_secs(5), || {
            n_batches.load(Ordering::SeqCst) > 6
        }));

        // Stopping the simulator disconnects the consumer
        exp_replay.stop_and_join()?;
        let err = consumer.join().unwrap().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LandmarkError>(),
            Some(LandmarkError::SimulatorStopped(_))
        ));
        Ok(())
    }

    #[test]
    fn test_greedy_actions_with_lowest_index_on_ties() -> Result<()> {
        let config = config().init_exploration(0.0);
        let predictor = ConstPredictor::new(vec![0., 0., 1., 1., 0., 0.]);
        let n_calls = predictor.call_counter();
        let mut exp_replay = ExpReplay::build(config, env(), Box::new(predictor), None)?;
        exp_replay.start()?;

        // Indices from 20 on are past the random warm-up steps
        let batch = exp_replay.batches()?.next_batch()?;
        assert!(batch.action.iter().all(|&a| a == 2));
        assert!(n_calls.load(Ordering::SeqCst) > 0);
        exp_replay.stop_and_join()
    }

    #[test]
    fn test_trigger_records_played_episodes() -> Result<()> {
        let mut exp_replay = ExpReplay::build(config(), env(), predictor(), None)?;
        exp_replay.start()?;
        exp_replay.wait_ready()?;

        let mut recorder = BufferedRecorder::new();
        exp_replay.trigger(10, &mut recorder);
        exp_replay.trigger(20, &mut recorder);
        let records = recorder.iter().collect::<Vec<_>>();

        // 60 steps with episodes of at most 7 steps
        assert!(records[0].get_scalar("n_games")? >= 8.);
        assert!(records[0].get("expreplay/mean_score").is_some());
        assert_eq!(records[1].get_scalar("n_games")?, 0.);
        exp_replay.stop_and_join()
    }

    /// Fails after a number of steps.
    struct FailingEnv {
        env: DummyEnv,
        steps_left: usize,
    }

    impl Env for FailingEnv {
        fn reset(&mut self) -> Result<ArrayD<u8>> {
            self.env.reset()
        }

        fn step(&mut self, act: usize, q_values: &[f32]) -> Result<Step> {
            if self.steps_left == 0 {
                bail!("image could not be read");
            }
            self.steps_left -= 1;
            self.env.step(act, q_values)
        }

        fn num_actions(&self) -> usize {
            6
        }
    }

    #[test]
    fn test_simulator_failure_is_reported() -> Result<()> {
        let env = FailingEnv {
            env: env(),
            steps_left: 10,
        };
        let mut exp_replay = ExpReplay::build(config(), env, predictor(), None)?;
        exp_replay.start()?;

        let err = exp_replay.wait_ready().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LandmarkError>(),
            Some(LandmarkError::SimulatorStopped(_))
        ));
        assert!(exp_replay.batches()?.next_batch().is_err());
        assert!(exp_replay.join().is_err());
        Ok(())
    }

    #[test]
    fn test_stop_disconnects_batches() -> Result<()> {
        let mut exp_replay = ExpReplay::build(config(), env(), predictor(), None)?;
        exp_replay.start()?;
        exp_replay.wait_ready()?;
        let mut batches = exp_replay.batches()?;
        exp_replay.stop_and_join()?;

        // The memory is still filled, but no token can be handed over
        assert!(batches.next_batch().is_ok());
        let err = batches.next_batch().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LandmarkError>(),
            Some(LandmarkError::SimulatorStopped(_))
        ));
        Ok(())
    }
}
