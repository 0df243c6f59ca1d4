use anyhow::Result;
use landmark_core::{error::LandmarkError, BrowseEnv};
use log::{debug, info};
use ndarray::ArrayD;

/// Finest scale reachable by zooming in.
pub const MIN_SCALE: u32 = 1;

/// Coarsest scale reachable by zooming out.
pub const MAX_SCALE: u32 = 3;

/// Buttons of browse mode.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BrowseAction {
    /// Moves into the volume.
    In,

    /// Moves up.
    Up,

    /// Moves right.
    Right,

    /// Moves left.
    Left,

    /// Moves down.
    Down,

    /// Moves out of the volume.
    Out,
}

impl BrowseAction {
    /// Index of the environment action.
    pub fn action(&self) -> usize {
        match self {
            Self::In => 0,
            Self::Up => 1,
            Self::Right => 2,
            Self::Left => 3,
            Self::Down => 4,
            Self::Out => 5,
        }
    }
}

/// Manual mode: the user moves through an image and zooms between scales.
///
/// Every input is refused with [`LandmarkError::InvalidState`] until an
/// environment is loaded with [`Browse::load`].
pub struct Browse<E: BrowseEnv> {
    env: Option<E>,
}

impl<E: BrowseEnv> Default for Browse<E> {
    fn default() -> Self {
        Self { env: None }
    }
}

impl<E: BrowseEnv> Browse<E> {
    /// Creates a browse session without an image.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the environment and returns its current observation.
    ///
    /// On failure the previous environment is kept.
    pub fn load<F: FnOnce() -> Result<E>>(&mut self, build_env: F) -> Result<ArrayD<u8>> {
        let env = build_env()?;
        let obs = env.current_observation();
        info!("Browse mode loaded an image at scale {}", env.scale());
        self.env = Some(env);
        Ok(obs)
    }

    /// Returns `true` if an environment is loaded.
    pub fn is_loaded(&self) -> bool {
        self.env.is_some()
    }

    /// Current scale, if an environment is loaded.
    pub fn scale(&self) -> Option<u32> {
        self.env.as_ref().map(|env| env.scale())
    }

    fn env_mut(&mut self) -> Result<&mut E> {
        self.env
            .as_mut()
            .ok_or_else(|| LandmarkError::InvalidState("no image loaded".into()).into())
    }

    /// Moves the view and returns the new observation.
    pub fn step(&mut self, action: BrowseAction) -> Result<ArrayD<u8>> {
        debug!("Browse {:?}", action);
        self.env_mut()?.manual_step(action.action())
    }

    /// Switches to the next finer scale.
    ///
    /// Returns the observation at the new scale, or `None` at [`MIN_SCALE`].
    pub fn zoom_in(&mut self) -> Result<Option<ArrayD<u8>>> {
        let env = self.env_mut()?;
        if env.scale() <= MIN_SCALE {
            return Ok(None);
        }
        env.adjust_scale(true)?;
        Ok(Some(env.current_observation()))
    }

    /// Switches to the next coarser scale.
    ///
    /// Returns the observation at the new scale, or `None` at [`MAX_SCALE`].
    pub fn zoom_out(&mut self) -> Result<Option<ArrayD<u8>>> {
        let env = self.env_mut()?;
        if env.scale() >= MAX_SCALE {
            return Ok(None);
        }
        env.adjust_scale(false)?;
        Ok(Some(env.current_observation()))
    }
}
