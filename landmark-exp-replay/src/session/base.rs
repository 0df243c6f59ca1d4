use super::{SessionConfig, SessionEvent};
use crate::{RunControl, Speed};
use anyhow::Result;
use crossbeam_channel::{unbounded, Receiver, Sender};
use landmark_core::{
    error::LandmarkError,
    util::{argmax, stack_history},
    Env, Predictor, StatCounter, Usecase,
};
use log::{info, warn};
use ndarray::{ArrayD, Axis, IxDyn};
use std::{collections::VecDeque, thread::JoinHandle};

/// State of a [`Session`] as shown to the user.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SessionState {
    /// No agent is playing.
    NotRunning,

    /// The agent is playing.
    Running,

    /// The agent waits for resume.
    Paused,
}

/// Plays a trained agent on a list of images in automatic mode.
///
/// The agent runs on a worker thread and reports its moves as
/// [`SessionEvent`]s. The session can be paused, resumed and terminated at
/// any step, and started again afterwards.
pub struct Session {
    config: SessionConfig,
    control: RunControl,
    events: Option<Receiver<SessionEvent>>,
    handle: Option<JoinHandle<Result<()>>>,
}

impl Session {
    /// Creates a session which is not running.
    pub fn new(config: SessionConfig) -> Self {
        let control = RunControl::new();
        control.set_speed(config.speed);
        Self {
            config,
            control,
            events: None,
            handle: None,
        }
    }

    /// Starts playing.
    ///
    /// The environment is built on the calling thread. If it cannot be built,
    /// or the use case is [`Usecase::UserDefined`], the session stays
    /// [`SessionState::NotRunning`] and [`LandmarkError::InvalidUsecase`] is
    /// returned for notifying the user.
    pub fn start<E, F, P>(&mut self, build_env: F, predictor: P) -> Result<()>
    where
        E: Env + Send + 'static,
        F: FnOnce(&SessionConfig) -> Result<E>,
        P: Predictor + 'static,
    {
        if self.state() != SessionState::NotRunning {
            return Err(LandmarkError::InvalidState("session is running".into()).into());
        }
        // Collects the result of a finished run
        if let Err(e) = self.join() {
            warn!("Previous run finished with error: {:?}", e);
        }

        if self.config.usecase == Usecase::UserDefined {
            warn!("Model, image and landmark files do not match a use case");
            return Err(LandmarkError::InvalidUsecase(
                "model, image and landmark files do not match a use case".into(),
            )
            .into());
        }
        let env = match build_env(&self.config) {
            Ok(env) => env,
            Err(e) => {
                warn!("Failed to build the environment: {:?}", e);
                return Err(LandmarkError::InvalidUsecase(format!("{:#}", e)).into());
            }
        };

        let control = RunControl::new();
        control.set_speed(self.control.speed());
        self.control = control.clone();

        let (sender, receiver) = unbounded();
        self.events = Some(receiver);

        info!(
            "Start {:?} Mode ({:?})",
            self.config.task, self.config.usecase
        );
        let history_len = self.config.history_len;
        let handle = std::thread::Builder::new()
            .name("SessionThread".into())
            .spawn(move || play(env, predictor, history_len, control, sender))?;
        self.handle = Some(handle);
        Ok(())
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        match self.handle.as_ref() {
            Some(h) if !h.is_finished() => {
                if self.control.is_paused() {
                    SessionState::Paused
                } else {
                    SessionState::Running
                }
            }
            _ => SessionState::NotRunning,
        }
    }

    /// Receiver of the events of the current run.
    pub fn events(&self) -> Option<Receiver<SessionEvent>> {
        self.events.clone()
    }

    /// Pauses the agent before its next move.
    pub fn pause(&self) {
        if self.state() == SessionState::Running {
            info!("Pause");
            self.control.pause();
        }
    }

    /// Resumes a paused agent.
    pub fn resume(&self) {
        if self.state() == SessionState::Paused {
            info!("Resume");
            self.control.resume();
        }
    }

    /// Sets the pace of the agent, also for later runs.
    pub fn set_speed(&mut self, speed: Speed) {
        self.config.speed = speed;
        self.control.set_speed(speed);
    }

    /// Stops the agent and waits for the worker thread.
    ///
    /// The session is [`SessionState::NotRunning`] afterwards.
    pub fn terminate(&mut self) -> Result<()> {
        if self.handle.is_some() {
            info!("Terminate");
        }
        self.control.stop();
        self.join()
    }

    /// Waits until all episodes are played, returning the result of the worker.
    pub fn join(&mut self) -> Result<()> {
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| {
                LandmarkError::SimulatorStopped("session thread panicked".into())
            })?,
            None => Ok(()),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Err(e) = self.terminate() {
            warn!("Session finished with error: {:?}", e);
        }
    }
}

/// Plays `env.num_files()` episodes greedily.
fn play<E: Env, P: Predictor>(
    mut env: E,
    mut predictor: P,
    history_len: usize,
    control: RunControl,
    events: Sender<SessionEvent>,
) -> Result<()> {
    let total_episodes = env.num_files();
    let mut scores = StatCounter::default();
    let mut dist_errors = StatCounter::default();

    // Events are dropped once the receiver is gone
    let send = |event: SessionEvent| {
        let _ = events.send(event);
    };

    for episode in 1..=total_episodes {
        let obs = env.reset()?;
        let shape = obs.shape().to_vec();
        let mut frames = (1..history_len)
            .map(|_| ArrayD::zeros(IxDyn(&shape)))
            .collect::<VecDeque<_>>();
        frames.push_back(obs);

        loop {
            if !control.checkpoint() {
                info!("Terminated in episode {}", episode);
                send(SessionEvent::Terminated);
                return Ok(());
            }

            let state = stack_history(frames.make_contiguous())?.insert_axis(Axis(0));
            let q = predictor.predict(state.view())?;
            if q.nrows() != 1 {
                return Err(LandmarkError::InvalidState(format!(
                    "predictor returned Q-values of shape {:?} for a single state",
                    q.shape()
                ))
                .into());
            }
            let q_values = q.row(0).to_vec();
            let act = argmax(&q_values);
            let step = env.step(act, &q_values)?;

            send(SessionEvent::Step {
                current_episode: episode,
                total_episodes,
                score: step.info.score,
                distance_error: step.info.dist_error,
                q_values,
            });
            control.sleep_for_speed();

            if step.is_over {
                scores.feed(step.info.score);
                dist_errors.feed(step.info.dist_error);
                send(SessionEvent::EpisodeEnd {
                    episode,
                    score: step.info.score,
                    distance_error: step.info.dist_error,
                    success: step.info.success,
                });
                break;
            }
            frames.pop_front();
            frames.push_back(step.obs);
        }
    }

    let mean_score = scores.average().unwrap_or(0.);
    let mean_distance_error = dist_errors.average().unwrap_or(0.);
    info!(
        "Played {} episodes, mean score {}, mean distance error {}",
        total_episodes, mean_score, mean_distance_error
    );
    send(SessionEvent::Finished {
        n_episodes: total_episodes,
        mean_score,
        mean_distance_error,
    });
    Ok(())
}
