use anyhow::Result;
use clap::Parser;
use ghbackup::backup::{self, BackupJob};
use ghbackup::git::GitCli;
use ghbackup::github::{GitHub, GitHubRepo};
use ghbackup::http::HttpClient;
use ghbackup::progress::{NoopReporter, Reporter, TerminalReporter};
use ghbackup::runtime::RealRuntime;
use std::path::PathBuf;

/// ghbackup - GitHub repository backup
///
/// Clones or fast-forwards the repository, downloads release artifacts,
/// snapshots issues and pull requests as flat text files, and optionally
/// bundles the whole backup into a single zip archive.
///
/// The GITHUB_TOKEN environment variable can be used instead of --token.
#[derive(Parser, Debug)]
#[command(author, version = env!("GHBACKUP_VERSION"), about)]
struct Cli {
    /// Owner of the repository to back up
    #[arg(long)]
    user: String,

    /// Repository name
    #[arg(long)]
    repo: String,

    /// Directory the backup is written into
    #[arg(long, value_name = "PATH")]
    download_path: PathBuf,

    /// GitHub API token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: String,

    /// Upper bound on releases fetched, rounded up to whole pages
    #[arg(long, default_value_t = 2000)]
    how_many_release: u64,

    /// Upper bound on issues fetched, rounded up to whole pages
    #[arg(long, default_value_t = 2000)]
    how_many_issue: u64,

    /// Upper bound on pull requests fetched, rounded up to whole pages
    #[arg(long, default_value_t = 2000)]
    how_many_pull_request: u64,

    /// Show progress bars
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Skip downloading releases and their assets
    #[arg(long)]
    skip_releases: bool,

    /// Skip snapshotting issues and pull requests
    #[arg(long)]
    skip_issues_pull_requests: bool,

    /// Skip writing the final zip archive
    #[arg(long)]
    skip_archive: bool,

    /// Archive file name (defaults to <user>-<repo>-backup_<timestamp>.zip)
    #[arg(long)]
    archive_name: Option<String>,

    /// GitHub API URL (defaults to https://api.github.com)
    #[arg(long = "api-url", value_name = "URL")]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = RealRuntime;

    let repo = GitHubRepo::new(cli.user, cli.repo);
    let archive_name = cli
        .archive_name
        .unwrap_or_else(|| BackupJob::default_archive_name(&repo));

    let job = BackupJob {
        repo,
        download_path: cli.download_path,
        token: cli.token,
        how_many_release: cli.how_many_release,
        how_many_issue: cli.how_many_issue,
        how_many_pull_request: cli.how_many_pull_request,
        releases: !cli.skip_releases,
        issues_pull_requests: !cli.skip_issues_pull_requests,
        turn_archive: !cli.skip_archive,
        archive_name,
    };

    let http = HttpClient::with_token(&job.token)?;
    let github = GitHub::new(http, cli.api_url);
    let reporter: Box<dyn Reporter> = if cli.verbose {
        Box::new(TerminalReporter)
    } else {
        Box::new(NoopReporter)
    };

    backup::run(&runtime, &github, &GitCli, &job, reporter.as_ref()).await
}
