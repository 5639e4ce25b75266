//! GitHub REST API client for fetching PRs and their review activity

use chrono::{DateTime, Utc};
use common::models::{
    Actor, Comment, Commit, DateRange, PullRequest, Repository, Review, User,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

const PER_PAGE: u32 = 100;
const MAX_PAGES: u32 = 50;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unauthorized: token is invalid or lacks the required scopes")]
    Unauthorized,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("GitHub API error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// GitHub API client, built per request from the caller's token
pub struct GitHubClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

/// Commit as returned by GitHub API
#[derive(Debug, Deserialize)]
pub struct GithubCommit {
    pub sha: String,
    pub commit: GithubCommitDetail,
    pub author: Option<Actor>,
}

#[derive(Debug, Deserialize)]
pub struct GithubCommitDetail {
    pub author: GithubCommitAuthor,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct GithubCommitAuthor {
    pub name: String,
    pub date: DateTime<Utc>,
}

impl From<GithubCommit> for Commit {
    fn from(c: GithubCommit) -> Self {
        Commit {
            sha: c.sha,
            message: c.commit.message,
            author_name: c.commit.author.name,
            authored_at: c.commit.author.date,
            author: c.author,
        }
    }
}

impl GitHubClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let client = reqwest::Client::new();
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("review-pulse/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        if let Ok(val) = HeaderValue::from_str(&format!("Bearer {}", self.token)) {
            headers.insert(AUTHORIZATION, val);
        }
        headers
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);
        let resp = self.client.get(&url).headers(self.headers()).send().await?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.json().await?)
    }

    /// Fetch the authenticated user, which doubles as a token check
    pub async fn validate_token(&self) -> Result<User, ClientError> {
        self.get("/user").await
    }

    /// Repositories of the authenticated user, most recently updated first
    pub async fn list_user_repos(&self) -> Result<Vec<Repository>, ClientError> {
        self.get(&format!("/user/repos?sort=updated&per_page={}", PER_PAGE))
            .await
    }

    /// Fetch one page of PRs in any state, most recently updated first
    pub async fn list_prs(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
    ) -> Result<Vec<PullRequest>, ClientError> {
        let path = format!(
            "/repos/{}/{}/pulls?state=all&sort=updated&direction=desc&per_page={}&page={}",
            owner, repo, PER_PAGE, page
        );
        self.get(&path).await
    }

    /// Fetch all PRs created inside `range`, handling pagination.
    ///
    /// Stops on an empty page, or once the last PR of a page was created
    /// before the window opens.
    pub async fn fetch_prs_in_range(
        &self,
        owner: &str,
        repo: &str,
        range: &DateRange,
    ) -> Result<Vec<PullRequest>, ClientError> {
        let mut all_prs = Vec::new();
        let mut page = 1u32;

        loop {
            info!("Fetching PRs page {} for {}/{}", page, owner, repo);
            let prs = self.list_prs(owner, repo, page).await?;

            let Some(last) = prs.last() else {
                break;
            };
            let past_window = last.created_at < range.start;

            all_prs.extend(prs.into_iter().filter(|pr| range.contains(pr.created_at)));

            if past_window {
                debug!("Reached PRs older than the window, stopping pagination");
                break;
            }

            page += 1;
            if page > MAX_PAGES {
                warn!("Hit pagination limit of {} pages", MAX_PAGES);
                break;
            }
        }

        info!("Fetched {} PRs total for {}/{}", all_prs.len(), owner, repo);
        Ok(all_prs)
    }

    /// Fetch a single PR, including its size fields
    pub async fn get_pr(
        &self,
        owner: &str,
        repo: &str,
        pr_number: i32,
    ) -> Result<PullRequest, ClientError> {
        self.get(&format!("/repos/{}/{}/pulls/{}", owner, repo, pr_number))
            .await
    }

    /// Fetch all reviews for a PR
    pub async fn list_reviews(
        &self,
        owner: &str,
        repo: &str,
        pr_number: i32,
    ) -> Result<Vec<Review>, ClientError> {
        self.get(&format!(
            "/repos/{}/{}/pulls/{}/reviews",
            owner, repo, pr_number
        ))
        .await
    }

    /// Fetch commits for a PR
    pub async fn list_commits(
        &self,
        owner: &str,
        repo: &str,
        pr_number: i32,
    ) -> Result<Vec<Commit>, ClientError> {
        let commits: Vec<GithubCommit> = self
            .get(&format!(
                "/repos/{}/{}/pulls/{}/commits",
                owner, repo, pr_number
            ))
            .await?;
        Ok(commits.into_iter().map(Commit::from).collect())
    }

    /// Fetch conversation comments for a PR (served by the issues API)
    pub async fn list_comments(
        &self,
        owner: &str,
        repo: &str,
        pr_number: i32,
    ) -> Result<Vec<Comment>, ClientError> {
        self.get(&format!(
            "/repos/{}/{}/issues/{}/comments",
            owner, repo, pr_number
        ))
        .await
    }
}
