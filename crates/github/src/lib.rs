//! GitHub API client for fetching PRs, reviews, commits and comments

pub mod client;

pub use client::{ClientError, GitHubClient, GithubCommit};
