use anyhow::Result;
use landmark_core::error::LandmarkError;
use std::sync::{Condvar, Mutex};

#[derive(Debug, Clone, PartialEq)]
enum Readiness {
    Pending,
    Ready,
    Failed(String),
}

/// One-shot signal telling batch consumers that the agent memory is filled.
///
/// The simulator resolves it exactly once, either as ready or as failed, so
/// waiters never block on a dead simulator.
#[derive(Debug)]
pub(crate) struct ReadySignal {
    state: Mutex<Readiness>,
    cvar: Condvar,
}

impl Default for ReadySignal {
    fn default() -> Self {
        Self {
            state: Mutex::new(Readiness::Pending),
            cvar: Condvar::new(),
        }
    }
}

impl ReadySignal {
    fn resolve(&self, v: Readiness) {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if *state == Readiness::Pending {
            *state = v;
            self.cvar.notify_all();
        }
    }

    /// Marks the memory as filled.
    pub fn set_ready(&self) {
        self.resolve(Readiness::Ready);
    }

    /// Marks the simulator as failed, if not resolved yet.
    pub fn set_failed(&self, reason: impl Into<String>) {
        self.resolve(Readiness::Failed(reason.into()));
    }

    /// Returns `true` once the memory is filled.
    pub fn is_ready(&self) -> bool {
        matches!(
            *self
                .state
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
            Readiness::Ready
        )
    }

    /// Blocks until the signal is resolved.
    pub fn wait(&self) -> Result<()> {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        while *state == Readiness::Pending {
            state = self
                .cvar
                .wait(state)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
        match &*state {
            Readiness::Failed(reason) => {
                Err(LandmarkError::SimulatorStopped(reason.clone()).into())
            }
            _ => Ok(()),
        }
    }
}
