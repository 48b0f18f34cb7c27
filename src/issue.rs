use chrono::{DateTime, Utc};

use crate::github::ApiIssue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueState {
    Open,
    Closed,
}

impl IssueState {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub number: i64,
    pub title: String,
    pub body: Option<String>,
    pub state: IssueState,
    pub created_at: DateTime<Utc>,
    pub labels: Vec<String>,
}

impl Issue {
    pub fn has_label_containing(&self, needle: &str) -> bool {
        self.labels.iter().any(|label| label.contains(needle))
    }
}

/// Maps a wire record to a domain issue. Pull requests and records with an
/// unknown state or unparseable timestamp map to `None`.
pub fn map_api_issue(issue: &ApiIssue) -> Option<Issue> {
    if issue.is_pull_request() {
        return None;
    }
    let state = match IssueState::parse(&issue.state) {
        Some(state) => state,
        None => {
            tracing::warn!(number = issue.number, state = %issue.state, "skipping issue with unknown state");
            return None;
        }
    };
    let created_at = match DateTime::parse_from_rfc3339(&issue.created_at) {
        Ok(created_at) => created_at.with_timezone(&Utc),
        Err(error) => {
            tracing::warn!(number = issue.number, %error, "skipping issue with invalid created_at");
            return None;
        }
    };

    Some(Issue {
        number: issue.number,
        title: issue.title.clone(),
        body: issue.body.clone(),
        state,
        created_at,
        labels: issue
            .labels
            .iter()
            .map(|label| label.name.clone())
            .collect(),
    })
}
