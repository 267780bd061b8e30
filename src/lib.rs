//! Aggregated insight reports for public source repositories.
//!
//! The library validates a repository reference, queries repository
//! metadata, contributors, language byte counts and a commit pagination probe
//! concurrently, and condenses them into an [`AnalysisResult`] carrying a
//! deterministic, rule-based verdict. Configuration and credentials are passed
//! in explicitly; nothing is read from process state.

mod analyzer;
mod commits;
mod config;
mod error;
mod languages;
mod reference;
mod source;
mod verdict;

pub use analyzer::{AnalysisResult, Analyzer, ContributorSummary};
pub use commits::{CommitProbe, resolve_commit_count};
pub use config::{AnalyzerConfig, DEFAULT_API_BASE_URL, DEFAULT_CONTRIBUTORS_LIMIT};
pub use error::{Error, io_error};
pub use languages::{LanguageBytes, LanguageShare, distribute};
pub use reference::{DEFAULT_WEB_HOST, RepositoryRef, normalize, normalize_for_host};
pub use source::{
    Credentials, Endpoint, GitHubSource, RawContributor, RawSourceBundle, RepositoryInfo,
    RepositorySource, SourceError, fetch,
};
pub use verdict::{Verdict, VerdictInput, classify, evaluate};
