use super::*;

impl GitHubClient {
    /// Fetches one page of issues. A non-success status comes back as
    /// [`ApiIssuesPageResult::Rejected`]; transport and decode failures are
    /// errors.
    pub async fn list_issues_page(
        &self,
        owner: &str,
        repo: &str,
        state: IssueStateParam,
        page: u32,
    ) -> Result<ApiIssuesPageResult> {
        let url = format!("{}/repos/{}/{}/issues", API_BASE, owner, repo);
        let response = self
            .client
            .get(url)
            .query(&[
                ("state", state.as_str()),
                ("per_page", &PER_PAGE.to_string()),
                ("page", &page.to_string()),
            ])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Ok(ApiIssuesPageResult::Rejected {
                status: status.as_u16(),
            });
        }

        let issues = response.json::<Vec<ApiIssue>>().await?;
        Ok(ApiIssuesPageResult::Page(issues))
    }
}
