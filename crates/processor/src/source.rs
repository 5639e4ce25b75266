//! Where PR data comes from: the live GitHub API or the demo fixtures

use chrono::Utc;
use common::models::{Comment, Commit, DateRange, PullRequest, Repository, Review, User};
use github::{ClientError, GitHubClient};
use tracing::info;

use crate::demo::{demo_comments, demo_commits, DemoData, DEMO_TOKEN};

/// Hosting API collaborator for one request
pub enum DataSource {
    Live(GitHubClient),
    Demo(Box<DemoData>),
}

impl DataSource {
    /// Pick the collaborator for `token`; the reserved demo token never hits the network
    pub fn for_token(api_url: &str, token: &str) -> Self {
        if token == DEMO_TOKEN {
            info!("Demo token presented, serving fixtures");
            DataSource::Demo(Box::new(DemoData::generate(Utc::now())))
        } else {
            DataSource::Live(GitHubClient::new(api_url, token))
        }
    }

    pub fn is_demo(&self) -> bool {
        matches!(self, DataSource::Demo(_))
    }

    pub async fn validate_token(&self) -> Result<User, ClientError> {
        match self {
            DataSource::Live(client) => client.validate_token().await,
            DataSource::Demo(data) => Ok(data.user.clone()),
        }
    }

    pub async fn list_repos(&self) -> Result<Vec<Repository>, ClientError> {
        match self {
            DataSource::Live(client) => client.list_user_repos().await,
            DataSource::Demo(data) => Ok(vec![data.repository.clone()]),
        }
    }

    /// PRs created inside `range`
    pub async fn fetch_prs(
        &self,
        owner: &str,
        name: &str,
        range: &DateRange,
    ) -> Result<Vec<PullRequest>, ClientError> {
        match self {
            DataSource::Live(client) => client.fetch_prs_in_range(owner, name, range).await,
            DataSource::Demo(data) => {
                demo_repo(data, owner, name)?;
                Ok(data
                    .prs
                    .iter()
                    .filter(|pr| range.contains(pr.created_at))
                    .cloned()
                    .collect())
            }
        }
    }

    pub async fn get_pr(
        &self,
        owner: &str,
        name: &str,
        number: i32,
    ) -> Result<PullRequest, ClientError> {
        match self {
            DataSource::Live(client) => client.get_pr(owner, name, number).await,
            DataSource::Demo(data) => demo_pr(data, owner, name, number).cloned(),
        }
    }

    pub async fn list_reviews(
        &self,
        owner: &str,
        name: &str,
        number: i32,
    ) -> Result<Vec<Review>, ClientError> {
        match self {
            DataSource::Live(client) => client.list_reviews(owner, name, number).await,
            DataSource::Demo(data) => {
                demo_pr(data, owner, name, number)?;
                Ok(data.reviews.get(&number).cloned().unwrap_or_default())
            }
        }
    }

    pub async fn list_commits(
        &self,
        owner: &str,
        name: &str,
        number: i32,
    ) -> Result<Vec<Commit>, ClientError> {
        match self {
            DataSource::Live(client) => client.list_commits(owner, name, number).await,
            DataSource::Demo(data) => Ok(demo_commits(demo_pr(data, owner, name, number)?)),
        }
    }

    pub async fn list_comments(
        &self,
        owner: &str,
        name: &str,
        number: i32,
    ) -> Result<Vec<Comment>, ClientError> {
        match self {
            DataSource::Live(client) => client.list_comments(owner, name, number).await,
            DataSource::Demo(data) => Ok(demo_comments(demo_pr(data, owner, name, number)?)),
        }
    }
}

fn demo_repo(data: &DemoData, owner: &str, name: &str) -> Result<(), ClientError> {
    if data.is_demo_repo(owner, name) {
        Ok(())
    } else {
        Err(ClientError::NotFound(format!("/repos/{}/{}", owner, name)))
    }
}

fn demo_pr<'a>(
    data: &'a DemoData,
    owner: &str,
    name: &str,
    number: i32,
) -> Result<&'a PullRequest, ClientError> {
    demo_repo(data, owner, name)?;
    data.pr(number).ok_or_else(|| {
        ClientError::NotFound(format!("/repos/{}/{}/pulls/{}", owner, name, number))
    })
}
