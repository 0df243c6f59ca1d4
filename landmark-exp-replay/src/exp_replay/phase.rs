use std::fmt;

/// Number of agent transitions in a mixed batch.
pub const MIXED_AGENT_SAMPLES: usize = 38;

/// Number of human transitions in a mixed batch.
pub const MIXED_HUMAN_SAMPLES: usize = 10;

/// Source of the transitions of a batch.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SamplingPhase {
    /// Human demonstrations only, while the update frequency is 0.
    Pretraining,

    /// [`MIXED_AGENT_SAMPLES`] agent and [`MIXED_HUMAN_SAMPLES`] human transitions.
    Mixed,

    /// Agent transitions only, when no demonstrations were loaded.
    AgentOnly,
}

impl SamplingPhase {
    /// Selects the phase for the next batch.
    pub fn select(update_frequency: usize, has_human_memory: bool) -> Self {
        if update_frequency == 0 {
            Self::Pretraining
        } else if has_human_memory {
            Self::Mixed
        } else {
            Self::AgentOnly
        }
    }
}

impl fmt::Display for SamplingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pretraining => "Human batch",
            Self::Mixed => "Mixed batch 0.8agent 0.2human",
            Self::AgentOnly => "Agent batch",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_phase() {
        assert_eq!(SamplingPhase::select(0, true), SamplingPhase::Pretraining);
        assert_eq!(SamplingPhase::select(0, false), SamplingPhase::Pretraining);
        assert_eq!(SamplingPhase::select(4, true), SamplingPhase::Mixed);
        assert_eq!(SamplingPhase::select(1, false), SamplingPhase::AgentOnly);
    }
}
