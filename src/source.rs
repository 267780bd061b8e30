// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Data-source queries issued for a single analysis request.
//!
//! [`RepositorySource`] is the seam between the aggregator and the hosting
//! service. [`GitHubSource`] talks to the GitHub REST API through octocrab,
//! while tests substitute in-memory sources. [`fetch`] issues the four
//! queries concurrently and fails as a unit on the first rejection.

use std::{fmt, future::Future};

use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    commits::CommitProbe, error::Error, languages::LanguageBytes, reference::RepositoryRef,
};

/// Status GitHub answers with when listing commits of an empty repository.
const EMPTY_REPOSITORY_STATUS: u16 = 409;
/// Status GitHub answers with when listing contributors of an empty repository.
const NO_CONTENT_STATUS: u16 = 204;

/// Bearer credential supplied by the caller for a single request.
///
/// The token is never logged; the [`fmt::Debug`] output is redacted.
#[derive(Clone, PartialEq, Eq,)]
pub struct Credentials
{
    token: String,
}

impl Credentials
{
    /// Wraps a bearer token after trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the token is blank.
    pub fn new<T: Into<String,>,>(token: T,) -> Result<Self, Error,>
    {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(Error::validation("GitHub token cannot be empty",),);
        }

        Ok(Self {
            token: trimmed.to_owned(),
        },)
    }

    /// Exposes the raw token for the HTTP client.
    pub fn expose(&self,) -> &str
    {
        &self.token
    }
}

impl fmt::Debug for Credentials
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        f.debug_struct("Credentials",).field("token", &"<redacted>",).finish()
    }
}

/// Repository metadata as reported by the hosting service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize,)]
pub struct RepositoryInfo
{
    pub name:        String,
    #[serde(default)]
    pub description: Option<String,>,
    #[serde(rename = "stargazers_count", default)]
    pub stars:       u64,
    #[serde(rename = "forks_count", default)]
    pub forks:       u64,
    #[serde(rename = "watchers_count", default)]
    pub watchers:    u64,
    #[serde(rename = "open_issues_count", default)]
    pub open_issues: u64,
    #[serde(default)]
    pub created_at:  Option<String,>,
    #[serde(default)]
    pub updated_at:  Option<String,>,
}

/// Contributor entry as reported by the hosting service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize,)]
pub struct RawContributor
{
    pub login:         String,
    #[serde(default)]
    pub avatar_url:    String,
    #[serde(default)]
    pub contributions: u64,
    #[serde(default)]
    pub html_url:      String,
}

/// Payloads collected for one request. Never shared across requests.
#[derive(Debug, Clone, Default, PartialEq, Eq,)]
pub struct RawSourceBundle
{
    pub repository:   RepositoryInfo,
    pub contributors: Vec<RawContributor,>,
    pub languages:    LanguageBytes,
    pub commits:      CommitProbe,
}

/// Logical query a [`SourceError`] originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq,)]
pub enum Endpoint
{
    Repository,
    Contributors,
    Languages,
    Commits,
}

impl fmt::Display for Endpoint
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        let label = match self {
            Self::Repository => "repository metadata",
            Self::Contributors => "contributors",
            Self::Languages => "languages",
            Self::Commits => "commit probe",
        };
        f.write_str(label,)
    }
}

/// Unclassified failure of a single source query.
///
/// Classification into the domain taxonomy happens once, in the aggregator,
/// through [`Error::from_source_status`].
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct SourceError
{
    /// Query that failed.
    pub endpoint: Endpoint,
    /// Response status, absent for transport and decoding failures.
    pub status:   Option<u16,>,
    /// Failure detail for diagnostics.
    pub message:  String,
}

impl SourceError
{
    /// Creates a failure carrying the response status.
    pub fn status<M: Into<String,>,>(endpoint: Endpoint, status: u16, message: M,) -> Self
    {
        Self {
            endpoint, status: Some(status,), message: message.into(),
        }
    }

    /// Creates a failure that never produced a usable response.
    pub fn transport<M: Into<String,>,>(endpoint: Endpoint, message: M,) -> Self
    {
        Self {
            endpoint, status: None, message: message.into(),
        }
    }

    fn from_octocrab(endpoint: Endpoint, error: &octocrab::Error,) -> Self
    {
        match error {
            octocrab::Error::GitHub {
                source, ..
            } => Self::status(endpoint, source.status_code.as_u16(), source.message.clone(),),
            other => Self::transport(endpoint, other.to_string(),),
        }
    }
}

impl fmt::Display for SourceError
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        match self.status {
            Some(status,) => write!(f, "{} request failed with {status}: {}", self.endpoint, self.message),
            None => write!(f, "{} request failed: {}", self.endpoint, self.message),
        }
    }
}

impl From<SourceError,> for Error
{
    fn from(error: SourceError,) -> Self
    {
        Error::from_source_status(error.status, error.to_string(),)
    }
}

/// Read-only queries the aggregator needs from a hosting service.
pub trait RepositorySource
{
    /// Fetches repository metadata.
    fn repository(
        &self,
        reference: &RepositoryRef,
    ) -> impl Future<Output = Result<RepositoryInfo, SourceError,>,> + Send;

    /// Fetches at most `limit` contributors ordered by contribution count.
    fn contributors(
        &self,
        reference: &RepositoryRef,
        limit: u8,
    ) -> impl Future<Output = Result<Vec<RawContributor,>, SourceError,>,> + Send;

    /// Fetches per-language byte counts.
    fn languages(
        &self,
        reference: &RepositoryRef,
    ) -> impl Future<Output = Result<LanguageBytes, SourceError,>,> + Send;

    /// Requests the first commit page with one item per page.
    fn commit_probe(
        &self,
        reference: &RepositoryRef,
    ) -> impl Future<Output = Result<CommitProbe, SourceError,>,> + Send;
}

/// Issues the four source queries concurrently.
///
/// The join resolves on the first failure without waiting for the remaining
/// queries; no partial bundle is ever produced.
///
/// # Errors
///
/// Returns the [`SourceError`] of the first query that failed.
pub async fn fetch<S,>(
    source: &S,
    reference: &RepositoryRef,
    contributors_limit: u8,
) -> Result<RawSourceBundle, SourceError,>
where
    S: RepositorySource,
{
    debug!("Fetching sources for {}", reference);

    let (repository, mut contributors, languages, commits,) = tokio::try_join!(
        source.repository(reference),
        source.contributors(reference, contributors_limit),
        source.languages(reference),
        source.commit_probe(reference),
    )?;

    contributors.truncate(usize::from(contributors_limit,),);

    debug!(
        "Fetched {} contributors and {} languages for {}",
        contributors.len(),
        languages.len(),
        reference
    );

    Ok(RawSourceBundle {
        repository,
        contributors,
        languages,
        commits,
    },)
}

/// Response parts retained from a raw GitHub request.
struct RawResponse
{
    status: u16,
    link:   Option<String,>,
    body:   String,
}

/// [`RepositorySource`] backed by the GitHub REST API.
#[derive(Clone,)]
pub struct GitHubSource
{
    client: Octocrab,
}

impl GitHubSource
{
    /// Builds a client that authorizes every request with `credentials`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Client`] when the base URL is invalid or the client
    /// cannot be constructed.
    pub fn connect(api_base_url: &str, credentials: &Credentials,) -> Result<Self, Error,>
    {
        let client = Octocrab::builder()
            .personal_token(credentials.expose().to_owned(),)
            .base_uri(api_base_url,)
            .map_err(|e| Error::Client {
                message: format!("invalid API base URL '{api_base_url}': {e}"),
            },)?
            .build()
            .map_err(|e| Error::Client {
                message: e.to_string(),
            },)?;

        Ok(Self {
            client,
        },)
    }

    async fn get_raw(&self, endpoint: Endpoint, route: &str,) -> Result<RawResponse, SourceError,>
    {
        debug!("GET {} ({})", route, endpoint);

        let response = self
            .client
            ._get(route,)
            .await
            .map_err(|e| SourceError::from_octocrab(endpoint, &e,),)?;
        let response = octocrab::map_github_error(response,)
            .await
            .map_err(|e| SourceError::from_octocrab(endpoint, &e,),)?;

        let status = response.status().as_u16();
        let link = response
            .headers()
            .get("link",)
            .and_then(|value| value.to_str().ok(),)
            .map(str::to_owned,);
        let body = self
            .client
            .body_to_string(response,)
            .await
            .map_err(|e| SourceError::from_octocrab(endpoint, &e,),)?;

        Ok(RawResponse {
            status,
            link,
            body,
        },)
    }
}

fn decode<T,>(endpoint: Endpoint, body: &str,) -> Result<T, SourceError,>
where
    T: for<'de,> Deserialize<'de,>,
{
    serde_json::from_str(body,).map_err(|e| {
        SourceError::transport(endpoint, format!("unexpected response payload: {e}"),)
    },)
}

fn language_bytes(
    map: serde_json::Map<String, serde_json::Value,>,
) -> Result<LanguageBytes, SourceError,>
{
    map.into_iter()
        .map(|(language, bytes,)| match bytes.as_u64() {
            Some(count,) => Ok((language, count,),),
            None => Err(SourceError::transport(
                Endpoint::Languages,
                format!("byte count for '{language}' is not an unsigned integer: {bytes}"),
            ),),
        },)
        .collect()
}

fn repo_route(reference: &RepositoryRef,) -> String
{
    format!("/repos/{}/{}", reference.owner(), reference.name())
}

impl RepositorySource for GitHubSource
{
    async fn repository(&self, reference: &RepositoryRef,) -> Result<RepositoryInfo, SourceError,>
    {
        let endpoint = Endpoint::Repository;
        let response = self.get_raw(endpoint, &repo_route(reference,),).await?;
        decode(endpoint, &response.body,)
    }

    async fn contributors(
        &self,
        reference: &RepositoryRef,
        limit: u8,
    ) -> Result<Vec<RawContributor,>, SourceError,>
    {
        let endpoint = Endpoint::Contributors;
        let route = format!("{}/contributors?per_page={limit}", repo_route(reference,));
        let response = self.get_raw(endpoint, &route,).await?;

        if response.status == NO_CONTENT_STATUS || response.body.trim().is_empty() {
            return Ok(Vec::new(),);
        }

        decode(endpoint, &response.body,)
    }

    async fn languages(&self, reference: &RepositoryRef,) -> Result<LanguageBytes, SourceError,>
    {
        let endpoint = Endpoint::Languages;
        let route = format!("{}/languages", repo_route(reference,));
        let response = self.get_raw(endpoint, &route,).await?;
        let map: serde_json::Map<String, serde_json::Value,> = decode(endpoint, &response.body,)?;
        language_bytes(map,)
    }

    async fn commit_probe(&self, reference: &RepositoryRef,) -> Result<CommitProbe, SourceError,>
    {
        let endpoint = Endpoint::Commits;
        let route = format!("{}/commits?per_page=1", repo_route(reference,));

        let response = match self.get_raw(endpoint, &route,).await {
            Ok(response,) => response,
            Err(error,) if error.status == Some(EMPTY_REPOSITORY_STATUS,) => {
                debug!("{} has no commits", reference);
                return Ok(CommitProbe::default(),);
            }
            Err(error,) => return Err(error,),
        };

        let items: Vec<serde_json::Value,> = decode(endpoint, &response.body,)?;
        Ok(CommitProbe::from_link_header(response.link.as_deref(), items.len(),),)
    }
}
