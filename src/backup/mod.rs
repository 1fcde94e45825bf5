//! Backup orchestration: configuration and the four-step run.

mod archive;
mod issues;
mod releases;
mod sync;

pub use archive::archive_backup;
pub use issues::{render_item, snapshot_issues_and_pulls};
pub use releases::{download_releases, ensure, materialize_release};
pub use sync::sync_repository;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::git::GitClient;
use crate::github::{GitHub, GitHubRepo};
use crate::progress::Reporter;
use crate::runtime::Runtime;

/// Configuration for one backup run. Built once at invocation and
/// immutable for the duration of the run.
#[derive(Debug, Clone)]
pub struct BackupJob {
    pub repo: GitHubRepo,
    pub download_path: PathBuf,
    pub token: String,
    pub how_many_release: u64,
    pub how_many_issue: u64,
    pub how_many_pull_request: u64,
    pub releases: bool,
    pub issues_pull_requests: bool,
    pub turn_archive: bool,
    pub archive_name: String,
}

impl BackupJob {
    /// Default archive file name: `<owner>-<repo>-backup_<unix seconds>.zip`.
    pub fn default_archive_name(repo: &GitHubRepo) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        format!("{}-{}-backup_{}.zip", repo.owner, repo.repo, now)
    }

    /// The archive is written next to the backup directory, never inside
    /// it, so archiving a tree cannot pick up its own output.
    pub fn archive_path(&self) -> PathBuf {
        self.download_path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(&self.archive_name)
    }
}

/// Runs the whole backup: synchronize the clone, materialize releases,
/// snapshot issues and pull requests, then archive. Steps run strictly in
/// that order, each toggleable, all I/O sequential.
#[tracing::instrument(skip_all, fields(repo = %job.repo))]
pub async fn run<R: Runtime>(
    runtime: &R,
    github: &GitHub,
    git: &dyn GitClient,
    job: &BackupJob,
    reporter: &dyn Reporter,
) -> Result<()> {
    let overall = reporter.task("Backup progress", 4);

    sync::sync_repository(runtime, git, &job.repo, &job.download_path)
        .await
        .context("Repository synchronization failed")?;
    overall.report(1);

    if job.releases {
        releases::download_releases(runtime, github, job, reporter).await?;
    }
    overall.report(1);

    if job.issues_pull_requests {
        issues::snapshot_issues_and_pulls(runtime, github, job, reporter).await?;
    }
    overall.report(1);

    if job.turn_archive {
        archive::archive_backup(runtime, &job.download_path, &job.archive_path(), reporter)?;
    }
    overall.report(1);

    overall.close();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockGitClient;
    use crate::http::HttpClient;
    use crate::progress::NoopReporter;
    use crate::runtime::RealRuntime;
    use reqwest::Client;
    use tempfile::tempdir;

    fn job(download_path: PathBuf) -> BackupJob {
        BackupJob {
            repo: GitHubRepo::new("owner", "repo"),
            download_path,
            token: "t".to_string(),
            how_many_release: 2000,
            how_many_issue: 2000,
            how_many_pull_request: 2000,
            releases: true,
            issues_pull_requests: true,
            turn_archive: true,
            archive_name: "owner-repo-backup_0.zip".to_string(),
        }
    }

    #[test]
    fn test_default_archive_name_shape() {
        let name = BackupJob::default_archive_name(&GitHubRepo::new("octo", "hello"));
        assert!(name.starts_with("octo-hello-backup_"));
        assert!(name.ends_with(".zip"));
    }

    #[test]
    fn test_archive_path_is_sibling_of_download_path() {
        let job = job(PathBuf::from("/data/backup"));
        assert_eq!(
            job.archive_path(),
            PathBuf::from("/data/owner-repo-backup_0.zip")
        );
    }

    #[tokio::test]
    async fn test_run_with_everything_toggled_off_only_synchronizes() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let download_path = dir.path().join("backup");

        let mut git = MockGitClient::new();
        git.expect_clone_repo().times(1).returning(|_, _| Ok(()));
        git.expect_pull().times(0);

        // No HTTP mocks are registered: any request would fail the run.
        let github = GitHub::new(
            HttpClient::new(Client::new()),
            Some("http://127.0.0.1:1".to_string()),
        );

        let mut job = job(download_path.clone());
        job.releases = false;
        job.issues_pull_requests = false;
        job.turn_archive = false;

        run(&runtime, &github, &git, &job, &NoopReporter)
            .await
            .unwrap();

        // The synchronizer created the backup directory.
        assert!(download_path.is_dir());
    }

    #[tokio::test]
    async fn test_run_writes_archive_when_enabled() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let download_path = dir.path().join("backup");

        let _releases = server
            .mock("GET", "/repos/owner/repo/releases?per_page=100&page=1")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;
        let _issues = server
            .mock(
                "GET",
                "/repos/owner/repo/issues?per_page=100&page=1&state=all",
            )
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;
        let _pulls = server
            .mock(
                "GET",
                "/repos/owner/repo/pulls?per_page=100&page=1&state=all",
            )
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let mut git = MockGitClient::new();
        git.expect_clone_repo().times(1).returning(|_, _| Ok(()));

        let github = GitHub::new(HttpClient::new(Client::new()), Some(url));

        let job = job(download_path.clone());
        run(&runtime, &github, &git, &job, &NoopReporter)
            .await
            .unwrap();

        assert!(download_path.join("issues").is_dir());
        assert!(download_path.join("pulls").is_dir());
        assert!(job.archive_path().is_file());
    }

    #[tokio::test]
    async fn test_run_aborts_when_synchronization_fails() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();

        let mut git = MockGitClient::new();
        git.expect_clone_repo()
            .returning(|_, _| Err(anyhow::anyhow!("git clone exited with exit status: 128")));

        let github = GitHub::new(
            HttpClient::new(Client::new()),
            Some("http://127.0.0.1:1".to_string()),
        );

        let result = run(
            &runtime,
            &github,
            &git,
            &job(dir.path().join("backup")),
            &NoopReporter,
        )
        .await;

        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("synchronization failed")
        );
    }
}
