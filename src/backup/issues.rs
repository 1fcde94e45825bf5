//! Issue and pull request snapshots: one flat text file per item.
//!
//! Snapshots are not incremental. Each run fully clears the output
//! directory of regular files and rewrites it from the fresh fetch.

use anyhow::{Context, Result};
use log::debug;
use std::path::Path;

use crate::backup::BackupJob;
use crate::github::{GitHub, IssueRecord, page_budget};
use crate::progress::Reporter;
use crate::runtime::Runtime;

/// Renders the seven retained fields in a fixed, human-readable format.
/// Labels become a comma-separated list of names; a missing milestone or
/// body renders as an empty value.
pub fn render_item(item: &IssueRecord) -> String {
    let labels = item
        .labels
        .iter()
        .map(|label| label.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let milestone = item
        .milestone
        .as_ref()
        .map(|milestone| milestone.title.as_str())
        .unwrap_or_default();

    format!(
        "title: {}\nnumber: {}\nstate: {}\nbody: {}\nlabels: {}\nmilestone: {}\ncomments_url: {}\n",
        item.title,
        item.number,
        item.state,
        item.body.as_deref().unwrap_or_default(),
        labels,
        milestone,
        item.comments_url,
    )
}

/// Creates `dir` if needed and removes every regular file inside it.
/// Subdirectories are left alone.
fn reset_snapshot_dir<R: Runtime>(runtime: &R, dir: &Path) -> Result<()> {
    runtime
        .create_dir_all(dir)
        .with_context(|| format!("Failed to create snapshot directory {:?}", dir))?;

    for entry in runtime
        .read_dir(dir)
        .with_context(|| format!("Failed to list snapshot directory {:?}", dir))?
    {
        if runtime.is_file(&entry) {
            debug!("Removing stale snapshot {:?}", entry);
            runtime
                .remove_file(&entry)
                .with_context(|| format!("Failed to remove stale snapshot {:?}", entry))?;
        }
    }
    Ok(())
}

/// Full-replace write of one snapshot directory. A failure partway leaves
/// the already written files in place; there is no rollback.
fn write_snapshot<R: Runtime>(
    runtime: &R,
    dir: &Path,
    items: &[IssueRecord],
    reporter: &dyn Reporter,
    label: &str,
) -> Result<()> {
    reset_snapshot_dir(runtime, dir)?;

    let sink = reporter.task(label, items.len() as u64);
    for item in items {
        let path = dir.join(format!("{}.txt", item.number));
        runtime
            .write(&path, render_item(item).as_bytes())
            .with_context(|| format!("Failed to write snapshot {:?}", path))?;
        sink.report(1);
    }
    sink.close();
    Ok(())
}

/// Fetches and snapshots all issues, then all pull requests, each with its
/// own page budget, into `issues/` and `pulls/` under the backup directory.
#[tracing::instrument(skip_all)]
pub async fn snapshot_issues_and_pulls<R: Runtime>(
    runtime: &R,
    github: &GitHub,
    job: &BackupJob,
    reporter: &dyn Reporter,
) -> Result<()> {
    let sink = reporter.task("Fetching issues", page_budget(job.how_many_issue));
    let issues = github
        .issues(&job.repo, job.how_many_issue, sink.as_ref())
        .await?;
    sink.close();
    write_snapshot(
        runtime,
        &job.download_path.join("issues"),
        &issues,
        reporter,
        "Writing issues",
    )?;

    let sink = reporter.task(
        "Fetching pull requests",
        page_budget(job.how_many_pull_request),
    );
    let pulls = github
        .pulls(&job.repo, job.how_many_pull_request, sink.as_ref())
        .await?;
    sink.close();
    write_snapshot(
        runtime,
        &job.download_path.join("pulls"),
        &pulls,
        reporter,
        "Writing pull requests",
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{Label, Milestone};
    use crate::progress::NoopReporter;
    use crate::runtime::RealRuntime;
    use std::fs;
    use tempfile::tempdir;

    fn item(number: u64) -> IssueRecord {
        IssueRecord {
            number,
            state: "open".to_string(),
            title: format!("Issue {}", number),
            body: Some("Body text".to_string()),
            labels: vec![
                Label {
                    name: "bug".to_string(),
                },
                Label {
                    name: "help wanted".to_string(),
                },
            ],
            milestone: Some(Milestone {
                title: "v2.0".to_string(),
            }),
            comments_url: format!("https://api.example.com/issues/{}/comments", number),
        }
    }

    #[test]
    fn test_render_item_fixed_format() {
        let rendered = render_item(&item(42));
        assert_eq!(
            rendered,
            "title: Issue 42\n\
             number: 42\n\
             state: open\n\
             body: Body text\n\
             labels: bug, help wanted\n\
             milestone: v2.0\n\
             comments_url: https://api.example.com/issues/42/comments\n"
        );
    }

    #[test]
    fn test_render_item_empty_optionals() {
        let record = IssueRecord {
            number: 7,
            state: "closed".to_string(),
            title: "Bare".to_string(),
            body: None,
            labels: vec![],
            milestone: None,
            comments_url: "c".to_string(),
        };
        let rendered = render_item(&record);
        assert!(rendered.contains("body: \n"));
        assert!(rendered.contains("labels: \n"));
        assert!(rendered.contains("milestone: \n"));
    }

    #[test]
    fn test_write_snapshot_creates_files_by_number() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let issues_dir = dir.path().join("issues");

        write_snapshot(
            &runtime,
            &issues_dir,
            &[item(1), item(12)],
            &NoopReporter,
            "Writing issues",
        )
        .unwrap();

        assert!(issues_dir.join("1.txt").is_file());
        assert!(issues_dir.join("12.txt").is_file());
        assert_eq!(
            fs::read_to_string(issues_dir.join("12.txt")).unwrap(),
            render_item(&item(12))
        );
    }

    #[test]
    fn test_write_snapshot_is_full_replace() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let issues_dir = dir.path().join("issues");
        fs::create_dir_all(&issues_dir).unwrap();

        // Item 7 exists from an earlier run but is gone from the new fetch.
        fs::write(issues_dir.join("7.txt"), "stale").unwrap();

        write_snapshot(
            &runtime,
            &issues_dir,
            &[item(8)],
            &NoopReporter,
            "Writing issues",
        )
        .unwrap();

        assert!(!issues_dir.join("7.txt").exists());
        assert!(issues_dir.join("8.txt").is_file());
    }

    #[test]
    fn test_reset_leaves_subdirectories_alone() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let issues_dir = dir.path().join("issues");
        fs::create_dir_all(issues_dir.join("attachments")).unwrap();
        fs::write(issues_dir.join("1.txt"), "stale").unwrap();

        reset_snapshot_dir(&runtime, &issues_dir).unwrap();

        assert!(!issues_dir.join("1.txt").exists());
        assert!(issues_dir.join("attachments").is_dir());
    }
}
