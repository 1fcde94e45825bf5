//! Repository synchronization: clone on first run, fast-forward afterwards.

use anyhow::{Context, Result};
use log::info;
use std::path::Path;

use crate::git::GitClient;
use crate::github::GitHubRepo;
use crate::runtime::Runtime;

/// Clones the repository into `<download_path>/<repo>` when the directory
/// does not exist yet, otherwise fast-forwards the existing clone.
///
/// The pull runs with the process working directory changed into the clone
/// and restored afterwards whether or not the pull succeeded. Failures of
/// the underlying git invocation are surfaced untouched.
#[tracing::instrument(skip(runtime, git))]
pub async fn sync_repository<R: Runtime>(
    runtime: &R,
    git: &dyn GitClient,
    repo: &GitHubRepo,
    download_path: &Path,
) -> Result<()> {
    runtime
        .create_dir_all(download_path)
        .with_context(|| format!("Failed to create backup directory {:?}", download_path))?;

    let dest = download_path.join(&repo.repo);

    if runtime.exists(&dest) {
        info!("Updating existing clone at {:?}...", dest);
        let original = runtime.current_dir()?;
        runtime
            .set_current_dir(&dest)
            .with_context(|| format!("Failed to enter {:?}", dest))?;

        let pulled = git.pull().await;
        let restored = runtime.set_current_dir(&original);

        pulled.with_context(|| format!("Fast-forward update of {:?} failed", dest))?;
        restored.context("Failed to restore working directory")?;
        Ok(())
    } else {
        git.clone_repo(&repo.clone_url(), &dest)
            .await
            .with_context(|| format!("Clone of {} failed", repo))
    }
}
