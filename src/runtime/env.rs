//! Working directory operations.

use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn current_dir_impl(&self) -> Result<PathBuf> {
        env::current_dir().context("Failed to read current directory")
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn set_current_dir_impl(&self, path: &Path) -> Result<()> {
        env::set_current_dir(path)
            .with_context(|| format!("Failed to change directory to {:?}", path))?;
        Ok(())
    }
}
