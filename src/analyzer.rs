// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Orchestration of a single repository analysis.
//!
//! The pipeline normalizes the reference, fetches the four sources
//! concurrently, derives commit count and language shares, picks a verdict and
//! assembles an [`AnalysisResult`]. Source failures are classified here and
//! nowhere else.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    commits::resolve_commit_count,
    config::AnalyzerConfig,
    error::Error,
    languages::{LanguageShare, distribute},
    reference::{RepositoryRef, normalize_for_host},
    source::{Credentials, GitHubSource, RawContributor, RawSourceBundle, RepositorySource, fetch},
    verdict::{VerdictInput, classify},
};

/// Description reported when the repository has none.
const MISSING_DESCRIPTION: &str = "No description provided";

/// Contributor projection included in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
pub struct ContributorSummary
{
    pub login:         String,
    pub avatar:        String,
    pub contributions: u64,
    pub profile:       String,
}

impl From<RawContributor,> for ContributorSummary
{
    fn from(raw: RawContributor,) -> Self
    {
        Self {
            login:         raw.login,
            avatar:        raw.avatar_url,
            contributions: raw.contributions,
            profile:       raw.html_url,
        }
    }
}

/// Aggregated report for one repository.
///
/// Serializes to a flat camelCase JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult
{
    pub name:         String,
    pub description:  String,
    pub stars:        u64,
    pub forks:        u64,
    pub open_issues:  u64,
    pub watchers:     u64,
    pub commits:      u64,
    pub contributors: Vec<ContributorSummary,>,
    pub languages:    Vec<LanguageShare,>,
    pub created_at:   Option<String,>,
    pub updated_at:   Option<String,>,
    pub roast:        String,
}

impl AnalysisResult
{
    /// Derives the report from the raw payloads of one request.
    pub fn from_bundle(bundle: RawSourceBundle,) -> Self
    {
        let RawSourceBundle {
            repository,
            contributors,
            languages,
            commits,
        } = bundle;

        let commits = resolve_commit_count(&commits,);
        let languages = distribute(&languages,);
        let roast = classify(&VerdictInput {
            stars: repository.stars,
            forks: repository.forks,
            open_issues: repository.open_issues,
            commits,
            contributors: contributors.len(),
        },);

        let description = repository
            .description
            .filter(|text| !text.trim().is_empty(),)
            .unwrap_or_else(|| MISSING_DESCRIPTION.to_owned(),);

        Self {
            name: repository.name,
            description,
            stars: repository.stars,
            forks: repository.forks,
            open_issues: repository.open_issues,
            watchers: repository.watchers,
            commits,
            contributors: contributors.into_iter().map(ContributorSummary::from,).collect(),
            languages,
            created_at: repository.created_at,
            updated_at: repository.updated_at,
            roast: roast.to_owned(),
        }
    }
}

/// Entry point for repository analyses.
///
/// Holds configuration only; every call owns its own source payloads, so a
/// single analyzer can serve concurrent requests.
#[derive(Debug, Clone, Default,)]
pub struct Analyzer
{
    config: AnalyzerConfig,
}

impl Analyzer
{
    /// Creates an analyzer with explicit configuration.
    pub fn new(config: AnalyzerConfig,) -> Self
    {
        Self {
            config,
        }
    }

    /// Configuration the analyzer was built with.
    pub fn config(&self,) -> &AnalyzerConfig
    {
        &self.config
    }

    /// Parses a raw reference against the configured web host.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidReference`] for malformed input.
    pub fn normalize(&self, raw: &str,) -> Result<RepositoryRef, Error,>
    {
        normalize_for_host(raw, &self.config.web_host,)
    }

    /// Analyzes a repository against the GitHub API using `credentials`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidReference`] for malformed input before any
    /// request is made, [`Error::Client`] when the HTTP client cannot be
    /// built, and a classified source error when any query fails.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use repo_insight::{Analyzer, AnalyzerConfig, Credentials};
    ///
    /// # async fn example() -> Result<(), repo_insight::Error> {
    /// let analyzer = Analyzer::new(AnalyzerConfig::default(),);
    /// let credentials = Credentials::new("ghp_token",)?;
    /// let report = analyzer.analyze("https://github.com/rust-lang/rust", &credentials,).await?;
    /// println!("{}", report.roast);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn analyze(
        &self,
        raw: &str,
        credentials: &Credentials,
    ) -> Result<AnalysisResult, Error,>
    {
        let reference = self.normalize(raw,)?;
        let source = GitHubSource::connect(&self.config.api_base_url, credentials,)?;
        self.analyze_reference(&source, &reference,).await
    }

    /// Runs the pipeline against an arbitrary source.
    ///
    /// # Errors
    ///
    /// Same as [`Analyzer::analyze`], minus client construction.
    pub async fn analyze_with<S,>(&self, source: &S, raw: &str,) -> Result<AnalysisResult, Error,>
    where
        S: RepositorySource,
    {
        let reference = self.normalize(raw,)?;
        self.analyze_reference(source, &reference,).await
    }

    async fn analyze_reference<S,>(
        &self,
        source: &S,
        reference: &RepositoryRef,
    ) -> Result<AnalysisResult, Error,>
    where
        S: RepositorySource,
    {
        let bundle = fetch(source, reference, self.config.contributors_limit,).await.map_err(
            |failure| {
                warn!("Analysis of {} failed: {}", reference, failure);
                Error::from(failure,)
            },
        )?;

        let result = AnalysisResult::from_bundle(bundle,);
        info!(
            "Analyzed {}: {} commits, {} contributors, {} languages",
            reference,
            result.commits,
            result.contributors.len(),
            result.languages.len()
        );

        Ok(result,)
    }
}

#[cfg(test)]
mod tests
{
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::{
        commits::CommitProbe,
        languages::LanguageBytes,
        source::{Endpoint, RepositoryInfo, SourceError},
        verdict::Verdict,
    };

    const LINK: &str = concat!(
        r#"<https://api.github.com/repositories/9/commits?per_page=1&page=2>; rel="next", "#,
        r#"<https://api.github.com/repositories/9/commits?per_page=1&page=342>; rel="last""#,
    );

    #[derive(Default,)]
    struct FakeSource
    {
        bundle:  RawSourceBundle,
        failure: Option<SourceError,>,
        calls:   AtomicUsize,
    }

    impl FakeSource
    {
        fn respond<T,>(&self, endpoint: Endpoint, value: T,) -> Result<T, SourceError,>
        {
            self.calls.fetch_add(1, Ordering::SeqCst,);
            match &self.failure {
                Some(failure,) if failure.endpoint == endpoint => Err(failure.clone(),),
                _ => Ok(value,),
            }
        }
    }

    impl RepositorySource for FakeSource
    {
        async fn repository(&self, _: &RepositoryRef,) -> Result<RepositoryInfo, SourceError,>
        {
            self.respond(Endpoint::Repository, self.bundle.repository.clone(),)
        }

        async fn contributors(
            &self,
            _: &RepositoryRef,
            limit: u8,
        ) -> Result<Vec<RawContributor,>, SourceError,>
        {
            let mut contributors = self.bundle.contributors.clone();
            contributors.truncate(usize::from(limit,),);
            self.respond(Endpoint::Contributors, contributors,)
        }

        async fn languages(&self, _: &RepositoryRef,) -> Result<LanguageBytes, SourceError,>
        {
            self.respond(Endpoint::Languages, self.bundle.languages.clone(),)
        }

        async fn commit_probe(&self, _: &RepositoryRef,) -> Result<CommitProbe, SourceError,>
        {
            self.respond(Endpoint::Commits, self.bundle.commits.clone(),)
        }
    }

    fn healthy_bundle() -> RawSourceBundle
    {
        RawSourceBundle {
            repository:   RepositoryInfo {
                name:        "b".to_owned(),
                description: Some("A fine repository".to_owned(),),
                stars:       150,
                forks:       5,
                watchers:    150,
                open_issues: 10,
                created_at:  Some("2020-01-01T00:00:00Z".to_owned(),),
                updated_at:  Some("2024-06-01T00:00:00Z".to_owned(),),
            },
            contributors: ["alice", "bob", "carol",]
                .iter()
                .enumerate()
                .map(|(index, login,)| RawContributor {
                    login:         (*login).to_owned(),
                    avatar_url:    format!("https://avatars.example.com/{login}"),
                    contributions: 100 - index as u64,
                    html_url:      format!("https://github.com/{login}"),
                },)
                .collect(),
            languages:    vec![("JavaScript".to_owned(), 300,), ("Python".to_owned(), 100,)],
            commits:      CommitProbe::from_link_header(Some(LINK,), 1,),
        }
    }

    fn failing(status: Option<u16,>,) -> FakeSource
    {
        let failure = match status {
            Some(status,) => SourceError::status(Endpoint::Repository, status, "failure",),
            None => SourceError::transport(Endpoint::Repository, "dns lookup failed",),
        };
        FakeSource {
            bundle: healthy_bundle(), failure: Some(failure,), ..FakeSource::default()
        }
    }

    #[tokio::test]
    async fn successful_analysis_assembles_report()
    {
        let source = FakeSource {
            bundle: healthy_bundle(), ..FakeSource::default()
        };
        let analyzer = Analyzer::default();

        let result = analyzer
            .analyze_with(&source, "https://github.com/a/b.git",)
            .await
            .expect("analysis should succeed",);

        assert_eq!(source.calls.load(Ordering::SeqCst), 4);
        assert_eq!(result.name, "b");
        assert_eq!(result.description, "A fine repository");
        assert_eq!(result.commits, 342);
        assert_eq!(result.watchers, 150);
        assert_eq!(result.contributors.len(), 3);
        assert_eq!(result.contributors[0].login, "alice");
        assert_eq!(result.contributors[0].profile, "https://github.com/alice");
        assert_eq!(result.roast, Verdict::StarsNoForks.message());

        let total: f64 = result
            .languages
            .iter()
            .map(|share| share.percentage.parse::<f64,>().expect("numeric percentage",),)
            .sum();
        assert!((total - 100.0).abs() <= 0.1 * result.languages.len() as f64);
        assert_eq!(result.languages[0].name, "JavaScript");
        assert_eq!(result.languages[0].percentage, "75.0");
    }

    #[tokio::test]
    async fn report_serializes_as_flat_camel_case_object()
    {
        let source = FakeSource {
            bundle: healthy_bundle(), ..FakeSource::default()
        };
        let result = Analyzer::default()
            .analyze_with(&source, "https://github.com/a/b",)
            .await
            .expect("analysis should succeed",);

        let json = serde_json::to_value(&result,).expect("serialization failed",);
        let object = json.as_object().expect("object",);
        for key in [
            "name",
            "description",
            "stars",
            "forks",
            "openIssues",
            "watchers",
            "commits",
            "contributors",
            "languages",
            "createdAt",
            "updatedAt",
            "roast",
        ] {
            assert!(object.contains_key(key), "missing key {key}");
        }
        assert_eq!(json["contributors"][0]["avatar"], "https://avatars.example.com/alice");
        assert_eq!(json["languages"][1]["percentage"], "25.0");
    }

    #[tokio::test]
    async fn missing_description_gets_placeholder()
    {
        let mut bundle = healthy_bundle();
        bundle.repository.description = None;
        let source = FakeSource {
            bundle, ..FakeSource::default()
        };

        let result = Analyzer::default()
            .analyze_with(&source, "https://github.com/a/b",)
            .await
            .expect("analysis should succeed",);

        assert_eq!(result.description, "No description provided");
    }

    #[tokio::test]
    async fn empty_repository_reports_zero_commits()
    {
        let mut bundle = healthy_bundle();
        bundle.commits = CommitProbe::default();
        bundle.languages.clear();
        bundle.contributors.clear();
        let source = FakeSource {
            bundle, ..FakeSource::default()
        };

        let result = Analyzer::default()
            .analyze_with(&source, "https://github.com/a/b",)
            .await
            .expect("analysis should succeed",);

        assert_eq!(result.commits, 0);
        assert!(result.languages.is_empty());
        assert_eq!(result.roast, Verdict::LowCommits.message());
    }

    #[tokio::test]
    async fn contributors_limit_is_forwarded()
    {
        let source = FakeSource {
            bundle: healthy_bundle(), ..FakeSource::default()
        };
        let analyzer = Analyzer::new(AnalyzerConfig {
            contributors_limit: 1, ..AnalyzerConfig::default()
        },);

        let result = analyzer
            .analyze_with(&source, "https://github.com/a/b",)
            .await
            .expect("analysis should succeed",);

        assert_eq!(result.contributors.len(), 1);
        assert_eq!(result.roast, Verdict::StarsNoForks.message());
    }

    #[tokio::test]
    async fn invalid_reference_fails_before_any_query()
    {
        let source = FakeSource::default();

        let error = Analyzer::default()
            .analyze_with(&source, "https://example.com/a/b",)
            .await
            .expect_err("analysis should fail",);

        assert!(matches!(error, Error::InvalidReference { .. }));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn not_found_maps_to_repository_not_found()
    {
        let error = Analyzer::default()
            .analyze_with(&failing(Some(404,),), "https://github.com/a/b",)
            .await
            .expect_err("analysis should fail",);

        assert!(matches!(error, Error::RepositoryNotFound));
        assert_eq!(error.to_string(), "Repository not found or is private");
    }

    #[tokio::test]
    async fn unauthorized_maps_to_invalid_credential()
    {
        let error = Analyzer::default()
            .analyze_with(&failing(Some(401,),), "https://github.com/a/b",)
            .await
            .expect_err("analysis should fail",);

        assert!(matches!(error, Error::InvalidCredential));
    }

    #[tokio::test]
    async fn forbidden_maps_to_rate_limited()
    {
        let error = Analyzer::default()
            .analyze_with(&failing(Some(403,),), "https://github.com/a/b",)
            .await
            .expect_err("analysis should fail",);

        assert!(matches!(error, Error::RateLimited));
    }

    #[tokio::test]
    async fn other_failures_keep_detail()
    {
        let error = Analyzer::default()
            .analyze_with(&failing(None,), "https://github.com/a/b",)
            .await
            .expect_err("analysis should fail",);

        match error {
            Error::UnknownSource {
                status,
                message,
            } => {
                assert_eq!(status, None);
                assert!(message.contains("dns lookup failed"));
            }
            other => panic!("expected unknown source error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn configured_web_host_is_honoured()
    {
        let source = FakeSource {
            bundle: healthy_bundle(), ..FakeSource::default()
        };
        let analyzer = Analyzer::new(AnalyzerConfig {
            web_host: "git.example.org".to_owned(), ..AnalyzerConfig::default()
        },);

        assert!(analyzer.analyze_with(&source, "https://git.example.org/a/b",).await.is_ok());
        let error = analyzer
            .analyze_with(&source, "https://github.com/a/b",)
            .await
            .expect_err("github.com is not the configured host",);
        assert!(matches!(error, Error::InvalidReference { .. }));
    }
}
