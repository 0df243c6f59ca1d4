//! Replays demonstration logs into a replay memory.
use super::{DemonstrationConfig, EpisodeLog};
use crate::{error::LandmarkError, DemoEnv, Experience, ReplayMemory};
use anyhow::Result;
use log::info;
use std::{
    collections::HashSet,
    fs::{self, File},
    io::BufReader,
    path::{Path, PathBuf},
};

/// Counts reported by [`load_demonstrations`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DemonstrationStats {
    /// Episodes found in the logs of the use case.
    pub total_episodes: usize,

    /// Episodes on training images, replayed into the memory.
    pub used_episodes: usize,

    /// Transitions appended to the memory.
    pub transitions: usize,
}

/// Reads the names of the training images, without directory and extensions.
fn read_allowed_images(manifest: &Path) -> Result<HashSet<String>> {
    let text = fs::read_to_string(manifest)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let name = line.rsplit('/').next()?;
            name.split('.').next().map(str::to_string)
        })
        .collect())
}

/// Lists the logs of the use case, sorted by file name.
fn list_logs(log_dir: &Path, tag: &str) -> Result<Vec<PathBuf>> {
    let mut logs = Vec::new();
    for entry in fs::read_dir(log_dir)? {
        let path = entry?.path();
        let is_log = path
            .file_name()
            .and_then(|s| s.to_str())
            .map_or(false, |name| name.ends_with(".json") && name.contains(tag));
        if is_log && path.is_file() {
            logs.push(path);
        }
    }
    logs.sort();
    Ok(logs)
}

fn read_log(path: &Path) -> Result<Vec<EpisodeLog>> {
    let malformed = |reason: String| LandmarkError::MalformedDemonstration {
        path: path.to_path_buf(),
        reason,
    };
    let rdr = BufReader::new(File::open(path)?);
    let episodes: Vec<EpisodeLog> =
        serde_json::from_reader(rdr).map_err(|e| malformed(e.to_string()))?;
    for episode in episodes.iter() {
        episode.check_lengths().map_err(malformed)?;
    }
    Ok(episodes)
}

/// Fills `memory` with the expert demonstrations of a use case.
///
/// Every log in `config.log_dir` whose name ends with `.json` and contains
/// the demonstration tag of the use case is read. Episodes on images listed in
/// `config.train_manifest` are replayed: `build_env` creates an environment
/// for `<image_dir>/<img_name>.nii.gz`, which is positioned at every recorded
/// location except the last one. The observation at step `k` is appended with
/// the action, reward and termination flag of step `k + 1`, marked as human.
///
/// A missing log directory and unreadable logs are fatal.
pub fn load_demonstrations<E, F>(
    config: &DemonstrationConfig,
    memory: &mut ReplayMemory,
    mut build_env: F,
) -> Result<DemonstrationStats>
where
    E: DemoEnv,
    F: FnMut(&Path) -> Result<E>,
{
    let tag = config.usecase.demonstration_tag().ok_or_else(|| {
        LandmarkError::InvalidConfig("demonstrations require a known use case".into())
    })?;
    if !config.log_dir.is_dir() {
        return Err(LandmarkError::DemonstrationDirNotFound(config.log_dir.clone()).into());
    }

    let allowed_images = read_allowed_images(&config.train_manifest)?;
    let mut stats = DemonstrationStats::default();

    for log_file in list_logs(&config.log_dir, tag)? {
        info!("Log filename: {:?}", log_file);
        for episode in read_log(&log_file)? {
            stats.total_episodes += 1;
            if !allowed_images.contains(&episode.img_name) {
                continue;
            }

            let image_path = config
                .image_dir
                .join(format!("{}.nii.gz", episode.img_name));
            info!("Image path: {:?}", image_path);
            stats.used_episodes += 1;

            let mut env = build_env(&image_path)?;
            let n = episode.states.len();
            for k in 0..n.saturating_sub(1) {
                env.seek_to_location(episode.states[k], episode.resolution[k])?;
                let state = env.current_observation();
                memory.append(Experience::new(
                    state,
                    episode.actions[k + 1],
                    episode.rewards[k + 1],
                    episode.is_over[k + 1],
                    true,
                ))?;
                stats.transitions += 1;
            }
        }
    }

    info!("total images: {}", stats.total_episodes);
    info!("used images: {}", stats.used_episodes);
    Ok(stats)
}
