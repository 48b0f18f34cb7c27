use super::{IssueSource, fetch_all_issues};
use crate::github::{ApiIssue, ApiIssuesPageResult, ApiLabel, IssueStateParam};
use crate::issue::IssueState;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Mutex;

fn api_issue(number: i64, state: &str) -> ApiIssue {
    ApiIssue {
        number,
        state: state.to_string(),
        title: format!("Issue {}", number),
        body: None,
        created_at: "2024-03-05T12:00:00Z".to_string(),
        labels: vec![ApiLabel {
            name: "道路・歩道".to_string(),
        }],
        pull_request: None,
    }
}

fn numbered(range: std::ops::RangeInclusive<i64>, state: &str) -> Vec<ApiIssue> {
    range.map(|number| api_issue(number, state)).collect()
}

struct FakeTracker {
    open: Vec<ApiIssue>,
    closed: Vec<ApiIssue>,
    page_size: usize,
    reject_open_page: Option<u32>,
    reject_closed_page: Option<u32>,
    unreachable_closed_page: Option<u32>,
    requests: Mutex<Vec<(IssueStateParam, u32)>>,
}

impl FakeTracker {
    fn new(open: Vec<ApiIssue>, closed: Vec<ApiIssue>) -> Self {
        Self {
            open,
            closed,
            page_size: 100,
            reject_open_page: None,
            reject_closed_page: None,
            unreachable_closed_page: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests_for(&self, state: IssueStateParam) -> Vec<u32> {
        self.requests
            .lock()
            .expect("lock")
            .iter()
            .filter(|(requested, _)| *requested == state)
            .map(|(_, page)| *page)
            .collect()
    }
}

#[async_trait]
impl IssueSource for FakeTracker {
    async fn list_issues_page(
        &self,
        _owner: &str,
        _repo: &str,
        state: IssueStateParam,
        page: u32,
    ) -> Result<ApiIssuesPageResult> {
        self.requests.lock().expect("lock").push((state, page));
        let (issues, reject_page, unreachable_page) = match state {
            IssueStateParam::Open => (&self.open, self.reject_open_page, None),
            IssueStateParam::Closed => (
                &self.closed,
                self.reject_closed_page,
                self.unreachable_closed_page,
            ),
        };
        if unreachable_page == Some(page) {
            return Err(anyhow::anyhow!("connection reset"));
        }
        if reject_page == Some(page) {
            return Ok(ApiIssuesPageResult::Rejected { status: 403 });
        }

        let start = (page.saturating_sub(1) as usize).saturating_mul(self.page_size);
        if start >= issues.len() {
            return Ok(ApiIssuesPageResult::Page(Vec::new()));
        }
        let end = (start + self.page_size).min(issues.len());
        Ok(ApiIssuesPageResult::Page(issues[start..end].to_vec()))
    }
}

#[tokio::test]
async fn fetch_concatenates_open_before_closed() {
    let tracker = FakeTracker::new(numbered(1..=3, "open"), numbered(10..=11, "closed"));

    let report = fetch_all_issues(&tracker, "acme", "board")
        .await
        .expect("fetch");

    let numbers = report
        .issues
        .iter()
        .map(|issue| issue.number)
        .collect::<Vec<_>>();
    assert_eq!(numbers, vec![1, 2, 3, 10, 11]);
    assert_eq!(report.issues[0].state, IssueState::Open);
    assert_eq!(report.issues[4].state, IssueState::Closed);
    assert!(!report.is_partial());
}

#[tokio::test]
async fn fetch_stops_after_short_page() {
    let tracker = FakeTracker::new(numbered(1..=150, "open"), Vec::new());

    let report = fetch_all_issues(&tracker, "acme", "board")
        .await
        .expect("fetch");

    assert_eq!(report.issues.len(), 150);
    assert_eq!(tracker.requests_for(IssueStateParam::Open), vec![1, 2]);
    assert_eq!(tracker.requests_for(IssueStateParam::Closed), vec![1]);
}

#[tokio::test]
async fn fetch_stops_on_empty_page_after_full_page() {
    let tracker = FakeTracker::new(numbered(1..=100, "open"), Vec::new());

    let report = fetch_all_issues(&tracker, "acme", "board")
        .await
        .expect("fetch");

    assert_eq!(report.issues.len(), 100);
    assert_eq!(tracker.requests_for(IssueStateParam::Open), vec![1, 2]);
}

#[tokio::test]
async fn fetch_excludes_pull_requests() {
    let mut open = numbered(1..=3, "open");
    open[1].pull_request = Some(serde_json::json!({"url": "x"}));
    let tracker = FakeTracker::new(open, Vec::new());

    let report = fetch_all_issues(&tracker, "acme", "board")
        .await
        .expect("fetch");

    let numbers = report
        .issues
        .iter()
        .map(|issue| issue.number)
        .collect::<Vec<_>>();
    assert_eq!(numbers, vec![1, 3]);
}

#[tokio::test]
async fn pull_requests_count_toward_full_page_size() {
    let mut open = numbered(1..=101, "open");
    for issue in open.iter_mut().take(100) {
        issue.pull_request = Some(serde_json::json!({"url": "x"}));
    }
    let tracker = FakeTracker::new(open, Vec::new());

    let report = fetch_all_issues(&tracker, "acme", "board")
        .await
        .expect("fetch");

    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].number, 101);
    assert_eq!(tracker.requests_for(IssueStateParam::Open), vec![1, 2]);
}

#[tokio::test]
async fn rejected_later_page_keeps_partial_results_and_reports_truncation() {
    let mut tracker = FakeTracker::new(numbered(1..=250, "open"), numbered(300..=304, "closed"));
    tracker.reject_open_page = Some(2);

    let report = fetch_all_issues(&tracker, "acme", "board")
        .await
        .expect("fetch");

    assert_eq!(report.issues.len(), 105);
    assert!(report.is_partial());
    assert_eq!(report.truncated.len(), 1);
    assert_eq!(report.truncated[0].state, IssueStateParam::Open);
    assert_eq!(report.truncated[0].page, 2);
    assert_eq!(report.truncated[0].message, "HTTP 403");
    assert_eq!(tracker.requests_for(IssueStateParam::Open), vec![1, 2]);
}

#[tokio::test]
async fn one_state_rejected_on_first_page_is_partial_not_fatal() {
    let mut tracker = FakeTracker::new(numbered(1..=2, "open"), numbered(3..=4, "closed"));
    tracker.reject_closed_page = Some(1);

    let report = fetch_all_issues(&tracker, "acme", "board")
        .await
        .expect("fetch");

    assert_eq!(report.issues.len(), 2);
    assert_eq!(report.truncated[0].state, IssueStateParam::Closed);
}

#[tokio::test]
async fn every_state_rejected_on_first_page_is_an_error() {
    let mut tracker = FakeTracker::new(numbered(1..=2, "open"), numbered(3..=4, "closed"));
    tracker.reject_open_page = Some(1);
    tracker.reject_closed_page = Some(1);

    let error = fetch_all_issues(&tracker, "acme", "board")
        .await
        .expect_err("total failure");

    let message = error.to_string();
    assert!(message.contains("acme/board"));
    assert!(message.contains("HTTP 403"));
}

#[tokio::test]
async fn empty_repository_is_not_an_error() {
    let tracker = FakeTracker::new(Vec::new(), Vec::new());

    let report = fetch_all_issues(&tracker, "acme", "board")
        .await
        .expect("fetch");

    assert!(report.issues.is_empty());
    assert!(!report.is_partial());
}

#[tokio::test]
async fn transport_failure_after_other_state_succeeds_is_an_error() {
    let mut tracker = FakeTracker::new(numbered(1..=3, "open"), numbered(4..=5, "closed"));
    tracker.unreachable_closed_page = Some(1);

    let error = fetch_all_issues(&tracker, "acme", "board")
        .await
        .expect_err("transport failure");

    let message = format!("{:#}", error);
    assert!(message.contains("closed issues for acme/board (page 1)"));
    assert!(message.contains("connection reset"));
}

#[tokio::test]
async fn transport_failure_on_later_page_is_an_error() {
    let mut tracker = FakeTracker::new(Vec::new(), numbered(1..=150, "closed"));
    tracker.unreachable_closed_page = Some(2);

    let result = fetch_all_issues(&tracker, "acme", "board").await;

    assert!(result.is_err());
    assert_eq!(tracker.requests_for(IssueStateParam::Closed), vec![1, 2]);
}
