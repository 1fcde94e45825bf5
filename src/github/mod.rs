//! GitHub REST API access: repository identity, payload types, and the
//! paginated list fetcher.

mod client;
mod repo;
mod types;

pub use client::{GitHub, PER_PAGE, page_budget};
pub use repo::GitHubRepo;
pub use types::{IssueRecord, Label, Milestone, Release, ReleaseAsset};
