//! Plays a fixed agent on the dummy environment in automatic mode.
use anyhow::Result;
use clap::Parser;
use landmark_core::dummy::{ConstPredictor, DummyEnv};
use landmark_exp_replay::{Session, SessionConfig, SessionEvent, Speed};

/// Play an agent in automatic mode
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// The number of image files
    #[arg(long, default_value_t = 3)]
    files: usize,

    /// Speed slider position, 0 (slow) to 5 (fast)
    #[arg(long, default_value_t = 3)]
    speed: u8,

    /// Pause after this many moves, then resume
    #[arg(long)]
    pause_at: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = SessionConfig::default().speed(Speed::from_slider(args.speed));
    let mut session = Session::new(config);
    let files = args.files;
    session.start(
        |_| Ok(DummyEnv::new(&[8, 8]).files(files).target([3, 0, 0]).max_steps(10)),
        // Prefers +x, then +y
        ConstPredictor::new(vec![1.0, 0.0, 0.5, 0.0, 0.0, 0.0]),
    )?;

    let events = match session.events() {
        Some(events) => events,
        None => return Ok(()),
    };
    let mut n_moves = 0;
    for event in events.iter() {
        match event {
            SessionEvent::Step {
                current_episode,
                total_episodes,
                score,
                distance_error,
                q_values,
            } => {
                n_moves += 1;
                println!(
                    "[{}/{}] score {:.2}, distance error {:.2}, q {:?}",
                    current_episode, total_episodes, score, distance_error, q_values
                );
                if Some(n_moves) == args.pause_at {
                    session.pause();
                    println!("{:?}", session.state());
                    std::thread::sleep(std::time::Duration::from_millis(500));
                    session.resume();
                }
            }
            SessionEvent::EpisodeEnd {
                episode, success, ..
            } => println!("Episode {} finished, success: {}", episode, success),
            SessionEvent::Finished {
                n_episodes,
                mean_score,
                mean_distance_error,
            } => {
                println!(
                    "{} episodes, mean score {:.2}, mean distance error {:.2}",
                    n_episodes, mean_score, mean_distance_error
                );
                break;
            }
            SessionEvent::Terminated => break,
        }
    }
    session.join()
}
