use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use borsh::{BorshDeserialize, BorshSerialize};
use tracing::{info, warn};

use crate::utils::logger::LogMe;

/// Keeps the contract state on disk between invocations.
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StateStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the saved state, or the default one when nothing has been saved yet.
    pub fn load_or_default<S>(&self) -> Result<S>
    where
        S: BorshDeserialize + Default,
    {
        if !self.path.exists() {
            warn!(
                "No state found at {}, starting from an empty one",
                self.path.display()
            );
            return Ok(S::default());
        }
        let bytes = fs::read(&self.path).log_warn("Loading state from disk")?;
        let state = borsh::from_slice::<S>(&bytes)
            .with_context(|| format!("Decoding state file {}", self.path.display()))?;
        info!("Loaded state from {}", self.path.display());
        Ok(state)
    }

    /// Writes to a sibling temp file first, then renames it over the previous state.
    pub fn save<S>(&self, state: &S) -> Result<()>
    where
        S: BorshSerialize,
    {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).log_error("Creating data directory")?;
        }
        let encoded = borsh::to_vec(state).log_error("Serializing state")?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, encoded).log_error("Write state file")?;
        fs::rename(&tmp, &self.path).log_error("Replace state file")?;
        info!("Saved state on disk at {}", self.path.display());
        Ok(())
    }
}
