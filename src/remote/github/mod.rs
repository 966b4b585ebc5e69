//! GitHub implementation of [`crate::remote::RepositoryClient`].

mod client;
mod convert;
mod types;

pub use client::{GitHubClient, GITHUB_API_URL};
pub use convert::{headline, short_sha, SHORT_SHA_LEN};
