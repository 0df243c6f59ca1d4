//! Trains a toy learner on the dummy environment.
//!
//! The human memory is filled with expert moves toward the target, so the
//! run goes through the pretraining and the mixed phase.
use anyhow::Result;
use clap::Parser;
use landmark_core::{
    dummy::{ConstPredictor, DummyEnv},
    record::{BufferedRecorder, Record, RecordValue},
    Env, Experience, HyperParamSchedule, Predictor, ReplayMemory, TransitionBatch,
};
use landmark_exp_replay::{
    train_with_tensorboard, ExpReplay, ExpReplayConfig, Learner, Trainer, TrainerConfig,
};

const SHAPE: [usize; 2] = [8, 8];
const TARGET: [i32; 3] = [3, 2, 1];

/// Train a toy agent with experience replay and human demonstrations
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// The number of optimization steps
    #[arg(long, default_value_t = 2000)]
    max_opts: usize,

    /// Optimization steps on human demonstrations only
    #[arg(long, default_value_t = 500)]
    pretrain_opts: usize,

    /// The number of expert episodes in the human memory
    #[arg(long, default_value_t = 50)]
    expert_episodes: usize,

    /// Directory of TensorBoard logs, statistics are printed if not given
    #[arg(long)]
    model_dir: Option<String>,
}

/// Mean reward per action, used as Q-values.
struct MeanRewardLearner {
    sum: Vec<f32>,
    count: Vec<f32>,
}

impl MeanRewardLearner {
    fn new(n_actions: usize) -> Self {
        Self {
            sum: vec![0.; n_actions],
            count: vec![0.; n_actions],
        }
    }

    fn q_values(&self) -> Vec<f32> {
        self.sum
            .iter()
            .zip(self.count.iter())
            .map(|(s, c)| if *c > 0. { s / c } else { 0. })
            .collect()
    }
}

impl Learner for MeanRewardLearner {
    fn opt(&mut self, batch: &TransitionBatch) -> Result<Record> {
        let q = self.q_values();
        let mut loss = 0.;
        for (a, r) in batch.action.iter().zip(batch.reward.iter()) {
            let a = *a as usize;
            loss += (q[a] - r).powi(2);
            self.sum[a] += r;
            self.count[a] += 1.;
        }
        Ok(Record::from_slice(&[
            ("loss", RecordValue::Scalar(loss / batch.len() as f32)),
            ("q_values", RecordValue::Array1(self.q_values())),
        ]))
    }

    fn predictor(&self) -> Box<dyn Predictor> {
        Box::new(ConstPredictor::new(self.q_values()))
    }
}

/// Index of the move which reduces the distance to `TARGET` along the first
/// unfinished axis.
fn expert_action(location: [i32; 3]) -> Option<usize> {
    (0..3).find_map(|i| match location[i].cmp(&TARGET[i]) {
        std::cmp::Ordering::Less => Some(2 * i),
        std::cmp::Ordering::Greater => Some(2 * i + 1),
        std::cmp::Ordering::Equal => None,
    })
}

fn human_memory(n_episodes: usize, history_len: usize) -> Result<ReplayMemory> {
    let mut memory = ReplayMemory::new(10_000, &SHAPE, history_len)?;
    let mut env = DummyEnv::new(&SHAPE).target(TARGET);
    for _ in 0..n_episodes {
        let mut obs = env.reset()?;
        let mut location = [0, 0, 0];
        while let Some(act) = expert_action(location) {
            let step = env.step(act, &[])?;
            let axis = act / 2;
            location[axis] += if act % 2 == 0 { 1 } else { -1 };
            memory.append(Experience::new(obs, act, step.reward, step.is_over, true))?;
            obs = step.obs;
        }
    }
    Ok(memory)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let exp_replay_config = ExpReplayConfig::default()
        .batch_size(48)
        .memory_size(20_000)
        .init_memory_size(500)
        .history_len(4)
        .state_shape(SHAPE.to_vec());
    let trainer_config = TrainerConfig::default()
        .max_opts(args.max_opts)
        .trigger_interval(100)
        .sync_interval(50)
        .steps_per_epoch(100)
        .update_frequency_schedule(HyperParamSchedule::new(
            vec![(0, 0.), (args.pretrain_opts, 4.)],
            false,
            true,
        ));
    println!("{}", serde_yaml::to_string(&trainer_config)?);

    let human = human_memory(args.expert_episodes, exp_replay_config.history_len)?;
    let env = DummyEnv::new(&SHAPE).target(TARGET).max_steps(30);
    let mut learner = MeanRewardLearner::new(env.num_actions());
    let mut exp_replay =
        ExpReplay::build(exp_replay_config, env, learner.predictor(), Some(human))?;

    let stat = match args.model_dir {
        Some(model_dir) => {
            train_with_tensorboard(&model_dir, &mut exp_replay, &mut learner, &trainer_config)?
        }
        None => {
            let mut recorder = BufferedRecorder::new();
            let mut trainer = Trainer::build(trainer_config)?;
            let stat = trainer.train(&mut exp_replay, &mut learner, &mut recorder)?;
            for record in recorder.iter() {
                if let (Ok(opt_steps), Ok(n_games)) =
                    (record.get_scalar("opt_steps"), record.get_scalar("n_games"))
                {
                    println!(
                        "opt_steps {}, games {}, mean score {:?}",
                        opt_steps,
                        n_games,
                        record.get_scalar("expreplay/mean_score").ok()
                    );
                }
            }
            println!("{}", stat.fmt());
            stat
        }
    };
    exp_replay.stop_and_join()?;
    println!("Learned Q-values {:?} after {} steps", learner.q_values(), stat.opt_steps);

    Ok(())
}
