//! Imaging use cases and their default data files.
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Imaging modality a model was trained for.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
pub enum Usecase {
    /// Brain MRI.
    BrainMri,

    /// Cardiac MRI.
    CardiacMri,

    /// Fetal ultrasound.
    FetalUs,

    /// Files chosen by the user that do not match a known use case.
    UserDefined,
}

/// Files an agent needs to run on a use case.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone)]
pub struct UsecasePaths {
    /// Text file listing image paths.
    pub images: PathBuf,

    /// Model checkpoint.
    pub model: PathBuf,

    /// Text file listing landmark paths.
    pub landmarks: PathBuf,
}

impl Usecase {
    /// Tag that the names of demonstration logs contain.
    pub fn demonstration_tag(&self) -> Option<&'static str> {
        match self {
            Self::BrainMri => Some("BrainMRI"),
            Self::CardiacMri => Some("CardiacMRI"),
            Self::FetalUs => Some("FetalUS"),
            Self::UserDefined => None,
        }
    }

    /// Default data files of the use case.
    ///
    /// File lists live under `./data/filenames/`, or `./data/filenames/local/`
    /// if the data drive is not mounted. Returns `None` for [`Usecase::UserDefined`].
    pub fn default_paths(&self, mounted: bool) -> Option<UsecasePaths> {
        let redir = if mounted { "" } else { "local/" };
        let (prefix, model) = match self {
            Self::BrainMri => (
                "brain",
                "DQN_multiscale_brain_mri_point_pc_ROI_45_45_45/model-600000.data-00000-of-00001",
            ),
            Self::CardiacMri => ("cardiac", "DQN_cardiac_mri/model-600000.data-00000-of-00001"),
            Self::FetalUs => ("fetalUS", "DQN_ultrasound/model-600000.data-00000-of-00001"),
            Self::UserDefined => return None,
        };

        Some(UsecasePaths {
            images: PathBuf::from(format!(
                "./data/filenames/{}{}_train_files_new_paths.txt",
                redir, prefix
            )),
            model: PathBuf::from(format!("./data/models/{}", model)),
            landmarks: PathBuf::from(format!(
                "./data/filenames/{}{}_train_landmarks_new_paths.txt",
                redir, prefix
            )),
        })
    }

    /// Infers the use case of user-chosen files.
    ///
    /// The name of the directory containing the model and the file names of the
    /// image and landmark lists must all mention the same modality.
    /// Otherwise [`Usecase::UserDefined`] is returned.
    pub fn infer(model: &Path, images: &Path, landmarks: &Path) -> Self {
        let model_dir = model
            .parent()
            .and_then(Path::file_name)
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file_name = |p: &Path| {
            p.file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        };
        let images = file_name(images);
        let landmarks = file_name(landmarks);
        let all = |m: &str, f: &str| model_dir.contains(m) && images.contains(f) && landmarks.contains(f);

        if all("cardiac", "cardiac") {
            Self::CardiacMri
        } else if all("brain", "brain") {
            Self::BrainMri
        } else if all("ultrasound", "fetal") {
            Self::FetalUs
        } else {
            Self::UserDefined
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let paths = Usecase::BrainMri.default_paths(false).unwrap();
        assert_eq!(
            paths.images,
            PathBuf::from("./data/filenames/local/brain_train_files_new_paths.txt")
        );
        assert_eq!(
            paths.model,
            PathBuf::from(
                "./data/models/DQN_multiscale_brain_mri_point_pc_ROI_45_45_45/model-600000.data-00000-of-00001"
            )
        );

        let paths = Usecase::FetalUs.default_paths(true).unwrap();
        assert_eq!(
            paths.landmarks,
            PathBuf::from("./data/filenames/fetalUS_train_landmarks_new_paths.txt")
        );
        assert!(Usecase::UserDefined.default_paths(true).is_none());
    }

    #[test]
    fn test_infer_usecase() {
        let infer = |m: &str, i: &str, l: &str| Usecase::infer(Path::new(m), Path::new(i), Path::new(l));

        assert_eq!(
            infer(
                "/models/DQN_cardiac_mri/model-600000",
                "/lists/cardiac_files.txt",
                "/lists/cardiac_landmarks.txt"
            ),
            Usecase::CardiacMri
        );
        assert_eq!(
            infer("/m/DQN_ultrasound/model", "/l/fetalUS_files.txt", "/l/fetal_lm.txt"),
            Usecase::FetalUs
        );

        // The modality is read from the model directory, not the file name
        assert_eq!(
            infer("/m/other/brain_model", "/l/brain_files.txt", "/l/brain_lm.txt"),
            Usecase::UserDefined
        );
        assert_eq!(
            infer("/m/DQN_brain/model", "/l/brain_files.txt", "/l/cardiac_lm.txt"),
            Usecase::UserDefined
        );
    }

    #[test]
    fn test_demonstration_tag() {
        assert_eq!(Usecase::CardiacMri.demonstration_tag(), Some("CardiacMRI"));
        assert_eq!(Usecase::UserDefined.demonstration_tag(), None);
    }
}
