/// Notification from a running [`Session`](super::Session).
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The agent moved.
    Step {
        /// 1-based index of the current episode.
        current_episode: usize,

        /// Number of episodes of the session.
        total_episodes: usize,

        /// Accumulated reward of the episode.
        score: f32,

        /// Distance between the agent and the landmark.
        distance_error: f32,

        /// Action values the move was chosen with.
        q_values: Vec<f32>,
    },

    /// An episode ended.
    EpisodeEnd {
        /// 1-based index of the episode.
        episode: usize,

        /// Final score.
        score: f32,

        /// Final distance between the agent and the landmark.
        distance_error: f32,

        /// Whether the agent reached the landmark.
        success: bool,
    },

    /// All episodes were played.
    Finished {
        /// Number of played episodes.
        n_episodes: usize,

        /// Average final score.
        mean_score: f32,

        /// Average final distance error.
        mean_distance_error: f32,
    },

    /// The session was terminated before all episodes were played.
    Terminated,
}
