//! Cancellation, pausing and pacing of worker threads.
use serde::{Deserialize, Serialize};
use std::{
    sync::{Arc, Condvar, Mutex, MutexGuard},
    time::Duration,
};

/// Pace of an agent playing in automatic mode.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
pub enum Speed {
    /// No delay between steps.
    Fast,

    /// 100 ms between steps.
    Medium,

    /// 400 ms between steps.
    Slow,
}

impl Default for Speed {
    fn default() -> Self {
        Self::Fast
    }
}

impl Speed {
    /// Delay inserted after every step.
    pub fn delay(&self) -> Duration {
        match self {
            Self::Fast => Duration::from_millis(0),
            Self::Medium => Duration::from_millis(100),
            Self::Slow => Duration::from_millis(400),
        }
    }

    /// Maps a slider position in `0..=5` to a speed.
    pub fn from_slider(value: u8) -> Self {
        if value >= 4 {
            Self::Fast
        } else if value >= 2 {
            Self::Medium
        } else {
            Self::Slow
        }
    }
}

#[derive(Debug, Default)]
struct ControlState {
    stopped: bool,
    paused: bool,
    speed: Speed,
}

#[derive(Debug, Default)]
struct Inner {
    state: Mutex<ControlState>,
    cvar: Condvar,
}

/// Handle to control a worker thread.
///
/// Clones share the same state. The worker calls [`RunControl::checkpoint`] at
/// every step boundary, which blocks while paused and reports cancellation.
#[derive(Debug, Clone, Default)]
pub struct RunControl {
    inner: Arc<Inner>,
}

impl RunControl {
    /// Creates a running, unpaused control at [`Speed::Fast`].
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, ControlState> {
        // The state holds plain flags, a poisoned lock is still consistent
        self.inner
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Requests the worker to stop. Also releases a paused worker.
    pub fn stop(&self) {
        let mut state = self.state();
        state.stopped = true;
        state.paused = false;
        self.inner.cvar.notify_all();
    }

    /// Pauses the worker at its next checkpoint.
    pub fn pause(&self) {
        self.state().paused = true;
    }

    /// Resumes a paused worker.
    pub fn resume(&self) {
        self.state().paused = false;
        self.inner.cvar.notify_all();
    }

    /// Returns `true` if stop was requested.
    pub fn is_stopped(&self) -> bool {
        self.state().stopped
    }

    /// Returns `true` if the worker is requested to pause.
    pub fn is_paused(&self) -> bool {
        self.state().paused
    }

    /// Sets the pace of the worker.
    pub fn set_speed(&self, speed: Speed) {
        self.state().speed = speed;
    }

    /// Returns the pace of the worker.
    pub fn speed(&self) -> Speed {
        self.state().speed
    }

    /// Blocks while paused. Returns `false` once stop was requested.
    pub fn checkpoint(&self) -> bool {
        let mut state = self.state();
        while state.paused && !state.stopped {
            state = self
                .inner
                .cvar
                .wait(state)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
        !state.stopped
    }

    /// Sleeps for the delay of the current speed, waking up early on stop.
    pub fn sleep_for_speed(&self) {
        let state = self.state();
        let delay = state.speed.delay();
        if delay.is_zero() || state.stopped {
            return;
        }
        let _ = self
            .inner
            .cvar
            .wait_timeout_while(state, delay, |s| !s.stopped)
            .unwrap_or_else(|poisoned| poisoned.into_inner());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        thread,
        time::Instant,
    };

    #[test]
    fn test_speed_from_slider() {
        assert_eq!(Speed::from_slider(5), Speed::Fast);
        assert_eq!(Speed::from_slider(4), Speed::Fast);
        assert_eq!(Speed::from_slider(3), Speed::Medium);
        assert_eq!(Speed::from_slider(2), Speed::Medium);
        assert_eq!(Speed::from_slider(0), Speed::Slow);
        assert_eq!(Speed::Slow.delay(), Duration::from_millis(400));
    }

    #[test]
    fn test_pause_resume_stop() {
        let control = RunControl::new();
        let steps = Arc::new(AtomicUsize::new(0));

        let handle = {
            let control = control.clone();
            let steps = steps.clone();
            thread::spawn(move || {
                while control.checkpoint() {
                    steps.fetch_add(1, Ordering::SeqCst);
                    thread::sleep(Duration::from_millis(1));
                }
            })
        };

        thread::sleep(Duration::from_millis(20));
        control.pause();
        // Let the worker reach the gate
        thread::sleep(Duration::from_millis(20));
        let paused_at = steps.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(50));
        assert_eq!(steps.load(Ordering::SeqCst), paused_at);
        assert!(control.is_paused());

        control.resume();
        thread::sleep(Duration::from_millis(20));
        assert!(steps.load(Ordering::SeqCst) > paused_at);

        control.pause();
        control.stop();
        handle.join().unwrap();
        assert!(control.is_stopped());
        assert!(!control.is_paused());
    }

    #[test]
    fn test_stop_interrupts_slow_sleep() {
        let control = RunControl::new();
        control.set_speed(Speed::Slow);
        assert_eq!(control.speed(), Speed::Slow);

        let handle = {
            let control = control.clone();
            thread::spawn(move || {
                let t = Instant::now();
                control.sleep_for_speed();
                control.sleep_for_speed();
                t.elapsed()
            })
        };
        thread::sleep(Duration::from_millis(50));
        control.stop();
        let elapsed = handle.join().unwrap();
        assert!(elapsed < Duration::from_millis(800));
    }
}
