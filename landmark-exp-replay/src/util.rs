//! Utility functions.
use crate::{ExpReplay, Learner, TrainStat, Trainer, TrainerConfig};
use anyhow::Result;
use landmark_core::{error::LandmarkError, Env};
use landmark_tensorboard::TensorboardRecorder;
use log::info;
use std::{
    path::Path,
    sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

pub(crate) fn lock<T>(m: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    m.lock()
        .map_err(|e| LandmarkError::LockPoisoned(e.to_string()).into())
}

pub(crate) fn read<T>(m: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>> {
    m.read()
        .map_err(|e| LandmarkError::LockPoisoned(e.to_string()).into())
}

pub(crate) fn write<T>(m: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>> {
    m.write()
        .map_err(|e| LandmarkError::LockPoisoned(e.to_string()).into())
}

/// Runs training with statistics recorded for TensorBoard.
///
/// * `model_dir` - Directory where the TensorBoard logs are written.
/// * `exp_replay` - Experience replay providing batches, started if needed.
/// * `learner` - The network being trained.
/// * `trainer_config` - Configuration of [`Trainer`].
pub fn train_with_tensorboard<E, L, P>(
    model_dir: &P,
    exp_replay: &mut ExpReplay<E>,
    learner: &mut L,
    trainer_config: &TrainerConfig,
) -> Result<TrainStat>
where
    E: Env + Send + 'static,
    L: Learner,
    P: AsRef<Path>,
{
    let mut recorder = TensorboardRecorder::new(model_dir);
    let mut trainer = Trainer::build(trainer_config.clone())?;
    let stat = trainer.train(exp_replay, learner, &mut recorder)?;
    recorder.flush();
    info!("Stats of training\n{}", stat.fmt());
    Ok(stat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExpReplayConfig;
    use landmark_core::{
        dummy::{ConstPredictor, DummyEnv},
        record::Record,
        HyperParamSchedule, Predictor, TransitionBatch,
    };
    use tempdir::TempDir;

    struct NullLearner;

    impl Learner for NullLearner {
        fn opt(&mut self, batch: &TransitionBatch) -> Result<Record> {
            Ok(Record::from_scalar("batch_size", batch.len() as f32))
        }

        fn predictor(&self) -> Box<dyn Predictor> {
            Box::new(ConstPredictor::new(vec![0.; 6]))
        }
    }

    #[test]
    fn test_train_with_tensorboard() -> Result<()> {
        let config = ExpReplayConfig::default()
            .batch_size(4)
            .memory_size(100)
            .init_memory_size(20)
            .history_len(2)
            .state_shape(vec![2, 2]);
        let mut exp_replay = ExpReplay::build(
            config,
            DummyEnv::new(&[2, 2]),
            Box::new(ConstPredictor::new(vec![0.; 6])),
            None,
        )?;
        let trainer_config = TrainerConfig::default()
            .max_opts(10)
            .trigger_interval(5)
            .update_frequency_schedule(HyperParamSchedule::new(vec![(0, 1.)], false, true));

        let dir = TempDir::new("train_with_tensorboard")?;
        let stat = train_with_tensorboard(
            &dir.path(),
            &mut exp_replay,
            &mut NullLearner,
            &trainer_config,
        )?;
        assert_eq!(stat.opt_steps, 10);
        assert!(std::fs::read_dir(dir.path())?.next().is_some());
        exp_replay.stop_and_join()
    }
}
