//! Release materialization: one directory per tag, populated idempotently.

use anyhow::{Context, Result, ensure as anyhow_ensure};
use log::debug;
use std::future::Future;
use std::path::Path;

use crate::backup::BackupJob;
use crate::github::{GitHub, Release, page_budget};
use crate::http::HttpClient;
use crate::progress::Reporter;
use crate::runtime::Runtime;

/// Skip-if-exists capability shared by all release artifacts.
///
/// Existence is checked by path only; a partially written file from an
/// interrupted earlier run counts as present. Returns whether the producer
/// ran.
pub async fn ensure<R, F, Fut>(runtime: &R, path: &Path, produce: F) -> Result<bool>
where
    R: Runtime,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<()>>,
{
    if runtime.exists(path) {
        debug!("{:?} already present, skipping", path);
        return Ok(false);
    }
    produce().await?;
    Ok(true)
}

/// Rejects names that cannot be used verbatim as a single path component.
/// Unsafe tags and asset names are an error, never sanitized.
fn validate_component(kind: &str, name: &str) -> Result<()> {
    let unsafe_name = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0');
    anyhow_ensure!(
        !unsafe_name,
        "{} {:?} is not a safe file system name",
        kind,
        name
    );
    Ok(())
}

/// Writes one release into `<download_path>/<tag_name>/`.
///
/// Four independently idempotent artifact categories: the description
/// text, the source tarball, the source zipball, and one file per asset.
/// Assets that share a name resolve first-write-wins: the second download
/// finds the file present and skips.
#[tracing::instrument(skip(runtime, http, release), fields(tag = %release.tag_name))]
pub async fn materialize_release<R: Runtime>(
    runtime: &R,
    http: &HttpClient,
    release: &Release,
    download_path: &Path,
) -> Result<()> {
    validate_component("release tag", &release.tag_name)?;

    let release_dir = download_path.join(&release.tag_name);
    runtime
        .create_dir_all(&release_dir)
        .with_context(|| format!("Failed to create release directory {:?}", release_dir))?;

    let description = release_dir.join("description.txt");
    ensure(runtime, &description, || async {
        let name = release.name.as_deref().unwrap_or_default();
        let body = release.body.as_deref().unwrap_or_default();
        runtime.write(&description, format!("{}\n{}", name, body).as_bytes())
    })
    .await
    .context("Failed to write release description")?;

    let tarball = release_dir.join("source.tar.gz");
    ensure(runtime, &tarball, || async {
        http.download_file(&release.tarball_url, || runtime.create_file(&tarball))
            .await
            .map(|_| ())
    })
    .await
    .context("Failed to download source tarball")?;

    let zipball = release_dir.join("source.zip");
    ensure(runtime, &zipball, || async {
        http.download_file(&release.zipball_url, || runtime.create_file(&zipball))
            .await
            .map(|_| ())
    })
    .await
    .context("Failed to download source zipball")?;

    for asset in &release.assets {
        validate_component("asset name", &asset.name)?;
        let asset_path = release_dir.join(&asset.name);
        ensure(runtime, &asset_path, || async {
            http.download_file(&asset.download_url, || runtime.create_file(&asset_path))
                .await
                .map(|_| ())
        })
        .await
        .with_context(|| format!("Failed to download asset {}", asset.name))?;
    }

    Ok(())
}

/// Fetches the release list and materializes every release in order.
/// Progress is reported once per completed release.
#[tracing::instrument(skip_all)]
pub async fn download_releases<R: Runtime>(
    runtime: &R,
    github: &GitHub,
    job: &BackupJob,
    reporter: &dyn Reporter,
) -> Result<()> {
    let sink = reporter.task("Fetching releases", page_budget(job.how_many_release));
    let releases = github
        .releases(&job.repo, job.how_many_release, sink.as_ref())
        .await?;
    sink.close();

    let sink = reporter.task("Downloading releases", releases.len() as u64);
    for release in &releases {
        materialize_release(runtime, github.http(), release, &job.download_path)
            .await
            .with_context(|| format!("Failed to back up release {}", release.tag_name))?;
        sink.report(1);
    }
    sink.close();

    Ok(())
}
