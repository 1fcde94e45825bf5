use anyhow::{Context, Result};
use log::debug;
use serde::de::DeserializeOwned;

use crate::http::HttpClient;
use crate::progress::ProgressSink;

use super::repo::GitHubRepo;
use super::types::{IssueRecord, Release};

/// Fixed page size for every list request.
pub const PER_PAGE: u64 = 100;

/// Number of pages requested for a given item budget.
///
/// This is an upper bound, not an exact cap: the last page may bring the
/// total above the budget and results are never truncated afterwards.
pub fn page_budget(max_items: u64) -> u64 {
    max_items / PER_PAGE + 1
}

pub struct GitHub {
    http: HttpClient,
    api_url: String,
}

impl GitHub {
    #[tracing::instrument(skip(http, api_url))]
    pub fn new(http: HttpClient, api_url: Option<String>) -> Self {
        let api_url = api_url.unwrap_or_else(|| "https://api.github.com".to_string());
        Self { http, api_url }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Fetches up to [`page_budget`]`(max_items)` pages of a list resource,
    /// concatenating pages in request order.
    ///
    /// The server reports no total count; the sole end-of-data signal is an
    /// empty page, which terminates the loop early and flushes the unused
    /// page budget to the sink in one report. A non-2xx status or a
    /// malformed page aborts the whole resource.
    #[tracing::instrument(skip(self, extra_query, sink))]
    pub async fn fetch_paged<T: DeserializeOwned>(
        &self,
        repo: &GitHubRepo,
        resource: &str,
        extra_query: &[(&str, &str)],
        max_items: u64,
        sink: &dyn ProgressSink,
    ) -> Result<Vec<T>> {
        let url = format!(
            "{}/repos/{}/{}/{}",
            self.api_url, repo.owner, repo.repo, resource
        );
        let pages = page_budget(max_items);
        let per_page_param = PER_PAGE.to_string();
        let mut records = Vec::new();

        for page in 1..=pages {
            debug!("Fetching {} page {}/{} from {}...", resource, page, pages, url);

            let page_param = page.to_string();
            let mut query: Vec<(&str, &str)> =
                vec![("per_page", &per_page_param), ("page", &page_param)];
            query.extend_from_slice(extra_query);

            let parsed: Vec<T> = self
                .http
                .get_json_with_query(&url, &query)
                .await
                .with_context(|| format!("Failed to list {} page {}", resource, page))?;

            if parsed.is_empty() {
                sink.report(pages - page + 1);
                break;
            }

            records.extend(parsed);
            sink.report(1);
        }

        Ok(records)
    }

    #[tracing::instrument(skip(self, sink))]
    pub async fn releases(
        &self,
        repo: &GitHubRepo,
        max_items: u64,
        sink: &dyn ProgressSink,
    ) -> Result<Vec<Release>> {
        self.fetch_paged(repo, "releases", &[], max_items, sink)
            .await
    }

    /// Lists issues in every state. Note that the GitHub issues endpoint
    /// also returns pull requests; the snapshot keeps them, matching the
    /// full-replace semantics of the issues directory.
    #[tracing::instrument(skip(self, sink))]
    pub async fn issues(
        &self,
        repo: &GitHubRepo,
        max_items: u64,
        sink: &dyn ProgressSink,
    ) -> Result<Vec<IssueRecord>> {
        self.fetch_paged(repo, "issues", &[("state", "all")], max_items, sink)
            .await
    }

    #[tracing::instrument(skip(self, sink))]
    pub async fn pulls(
        &self,
        repo: &GitHubRepo,
        max_items: u64,
        sink: &dyn ProgressSink,
    ) -> Result<Vec<IssueRecord>> {
        self.fetch_paged(repo, "pulls", &[("state", "all")], max_items, sink)
            .await
    }
}
