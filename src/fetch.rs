use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;

use crate::github::{ApiIssuesPageResult, GitHubClient, IssueStateParam, PER_PAGE};
use crate::issue::{Issue, map_api_issue};

#[async_trait]
pub trait IssueSource {
    async fn list_issues_page(
        &self,
        owner: &str,
        repo: &str,
        state: IssueStateParam,
        page: u32,
    ) -> Result<ApiIssuesPageResult>;
}

#[async_trait]
impl IssueSource for GitHubClient {
    async fn list_issues_page(
        &self,
        owner: &str,
        repo: &str,
        state: IssueStateParam,
        page: u32,
    ) -> Result<ApiIssuesPageResult> {
        self.list_issues_page(owner, repo, state, page).await
    }
}

/// A state whose paging loop stopped on a rejected request instead of at
/// the end of the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncation {
    pub state: IssueStateParam,
    pub page: u32,
    pub message: String,
}

#[derive(Debug, Default, Clone)]
pub struct FetchReport {
    pub issues: Vec<Issue>,
    pub truncated: Vec<Truncation>,
}

impl FetchReport {
    pub fn is_partial(&self) -> bool {
        !self.truncated.is_empty()
    }
}

#[derive(Debug, Default)]
struct StateFetch {
    issues: Vec<Issue>,
    truncated: Option<Truncation>,
}

/// Fetches every open and closed issue, skipping pull requests.
///
/// Both states are paged concurrently. Open issues come first in the
/// result, closed issues after, each in the order the API returned them.
/// A page the API rejects ends that state's loop and is reported in
/// [`FetchReport::truncated`]. Transport and decode failures fail the whole
/// call, as does every state being rejected on its first page.
pub async fn fetch_all_issues(
    source: &dyn IssueSource,
    owner: &str,
    repo: &str,
) -> Result<FetchReport> {
    let (open, closed) = tokio::join!(
        fetch_state(source, owner, repo, IssueStateParam::Open),
        fetch_state(source, owner, repo, IssueStateParam::Closed),
    );
    let open = open?;
    let closed = closed?;

    let failed_outright = [&open, &closed]
        .iter()
        .all(|fetch| fetch.truncated.as_ref().is_some_and(|cut| cut.page == 1));
    if failed_outright {
        let message = open
            .truncated
            .as_ref()
            .map(|cut| cut.message.clone())
            .unwrap_or_default();
        return Err(anyhow!(
            "failed to fetch issues for {}/{}: {}",
            owner,
            repo,
            message
        ));
    }

    let mut report = FetchReport::default();
    for fetch in [open, closed] {
        report.issues.extend(fetch.issues);
        if let Some(cut) = fetch.truncated {
            tracing::warn!(
                state = cut.state.as_str(),
                page = cut.page,
                error = %cut.message,
                "issue listing stopped early; board shows partial data"
            );
            report.truncated.push(cut);
        }
    }
    tracing::info!(
        owner,
        repo,
        issues = report.issues.len(),
        partial = report.is_partial(),
        "fetched issues"
    );
    Ok(report)
}

async fn fetch_state(
    source: &dyn IssueSource,
    owner: &str,
    repo: &str,
    state: IssueStateParam,
) -> Result<StateFetch> {
    let mut fetch = StateFetch::default();
    let mut page = 1u32;
    loop {
        let result = source
            .list_issues_page(owner, repo, state, page)
            .await
            .with_context(|| {
                format!(
                    "failed to fetch {} issues for {}/{} (page {})",
                    state.as_str(),
                    owner,
                    repo,
                    page
                )
            })?;
        let batch = match result {
            ApiIssuesPageResult::Page(batch) => batch,
            ApiIssuesPageResult::Rejected { status } => {
                fetch.truncated = Some(Truncation {
                    state,
                    page,
                    message: format!("HTTP {}", status),
                });
                break;
            }
        };
        if batch.is_empty() {
            break;
        }
        let received = batch.len();
        tracing::debug!(state = state.as_str(), page, received, "fetched issue page");
        fetch
            .issues
            .extend(batch.iter().filter_map(map_api_issue));
        if received < PER_PAGE {
            break;
        }
        page += 1;
    }
    Ok(fetch)
}

#[cfg(test)]
mod tests;
