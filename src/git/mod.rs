//! Out-of-process git operations.
//!
//! Both operations shell out to the `git` binary via `tokio::process`.
//! The exit status is the only signal observed; output goes straight to
//! the user's terminal and failures are never interpreted or retried.

use anyhow::{Context, Result, ensure};
use async_trait::async_trait;
use log::info;
use std::path::Path;
use tokio::process::Command;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitClient: Send + Sync {
    /// Clone `url` into `dest`.
    async fn clone_repo(&self, url: &str, dest: &Path) -> Result<()>;

    /// Fast-forward the repository in the current working directory.
    async fn pull(&self) -> Result<()>;
}

pub struct GitCli;

#[async_trait]
impl GitClient for GitCli {
    #[tracing::instrument(skip(self))]
    async fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        info!("Cloning {} into {:?}...", url, dest);
        let status = Command::new("git")
            .arg("clone")
            .arg(url)
            .arg(dest)
            .status()
            .await
            .context("Failed to run git clone")?;
        ensure!(status.success(), "git clone exited with {}", status);
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn pull(&self) -> Result<()> {
        info!("Fast-forwarding existing clone...");
        let status = Command::new("git")
            .arg("pull")
            .status()
            .await
            .context("Failed to run git pull")?;
        ensure!(status.success(), "git pull exited with {}", status);
        Ok(())
    }
}
