use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ApiLabel {
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiIssue {
    pub number: i64,
    pub state: String,
    pub title: String,
    pub body: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub labels: Vec<ApiLabel>,
    pub pull_request: Option<serde_json::Value>,
}

impl ApiIssue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueStateParam {
    Open,
    Closed,
}

impl IssueStateParam {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

/// Outcome of one issue listing request that reached the API.
#[derive(Debug, Clone)]
pub enum ApiIssuesPageResult {
    Page(Vec<ApiIssue>),
    /// The API answered with a non-success status.
    Rejected { status: u16 },
}
