//! Configuration of the demonstration loader.
use crate::Usecase;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::{Path, PathBuf},
};

/// Configuration of [`load_demonstrations`](super::load_demonstrations).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct DemonstrationConfig {
    /// Directory containing the demonstration logs.
    pub log_dir: PathBuf,

    /// Directory containing the images the demonstrations were recorded on.
    pub image_dir: PathBuf,

    /// Text file listing the training images, one path per line.
    ///
    /// Demonstrations on other images are skipped.
    pub train_manifest: PathBuf,

    /// Use case of the demonstrations.
    pub usecase: Usecase,
}

impl Default for DemonstrationConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("./data/HITL"),
            image_dir: PathBuf::from("./data/images"),
            train_manifest: PathBuf::from("./data/filenames/brain_train_files_new_paths.txt"),
            usecase: Usecase::BrainMri,
        }
    }
}

impl DemonstrationConfig {
    /// Sets the directory of demonstration logs.
    pub fn log_dir(mut self, v: impl Into<PathBuf>) -> Self {
        self.log_dir = v.into();
        self
    }

    /// Sets the directory of images.
    pub fn image_dir(mut self, v: impl Into<PathBuf>) -> Self {
        self.image_dir = v.into();
        self
    }

    /// Sets the manifest of training images.
    pub fn train_manifest(mut self, v: impl Into<PathBuf>) -> Self {
        self.train_manifest = v.into();
        self
    }

    /// Sets the use case.
    pub fn usecase(mut self, v: Usecase) -> Self {
        self.usecase = v;
        self
    }

    /// Constructs [`DemonstrationConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`DemonstrationConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
