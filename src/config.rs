//! Configuration consumed by the aggregator.
//!
//! Values are deserialized from an optional YAML document and passed into
//! [`Analyzer::new`](crate::Analyzer::new) explicitly. Nothing in the library
//! reads process environment; the CLI resolves the credential separately.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    error::{self, Error},
    reference::DEFAULT_WEB_HOST,
};

/// REST endpoint used when no override is supplied.
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
/// Number of contributors requested per analysis.
pub const DEFAULT_CONTRIBUTORS_LIMIT: u8 = 10;
/// Largest page size the hosting service accepts.
const MAX_CONTRIBUTORS_LIMIT: u8 = 100;

/// Settings shared by every analysis performed by one [`Analyzer`](crate::Analyzer).
///
/// # Examples
///
/// ```
/// use repo_insight::AnalyzerConfig;
///
/// let yaml = r#"
/// api_base_url: https://github.example.com/api/v3
/// web_host: github.example.com
/// "#;
/// let config = AnalyzerConfig::from_yaml(yaml,)?;
/// assert_eq!(config.contributors_limit, 10);
/// # Ok::<(), repo_insight::Error>(())
/// ```
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq,)]
#[serde(deny_unknown_fields)]
pub struct AnalyzerConfig
{
    /// Base URL of the hosting service's REST API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Host accepted in repository references.
    #[serde(default = "default_web_host")]
    pub web_host: String,

    /// Number of contributors requested, constrained to `1..=100`.
    #[serde(
        default = "default_contributors_limit",
        deserialize_with = "deserialize_contributors_limit",
        alias = "contributors-limit",
        alias = "contributorsLimit"
    )]
    pub contributors_limit: u8,
}

impl Default for AnalyzerConfig
{
    fn default() -> Self
    {
        Self {
            api_base_url:       default_api_base_url(),
            web_host:           default_web_host(),
            contributors_limit: DEFAULT_CONTRIBUTORS_LIMIT,
        }
    }
}

impl AnalyzerConfig
{
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be read, [`Error::Parse`]
    /// when the YAML is malformed, and [`Error::Validation`] when a value
    /// violates invariants.
    pub fn load(path: &Path,) -> Result<Self, Error,>
    {
        let contents = fs::read_to_string(path,).map_err(|source| error::io_error(path, source,),)?;
        Self::from_yaml(&contents,)
    }

    /// Parses configuration from a YAML document string.
    ///
    /// An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::Parse`] and [`Error::Validation`].
    pub fn from_yaml(contents: &str,) -> Result<Self, Error,>
    {
        if contents.trim().is_empty() {
            return Ok(Self::default(),);
        }

        let config: Self = serde_yaml::from_str(contents,)?;
        config.validate()?;
        Ok(config,)
    }

    /// Loads the file at `path` when present, defaults otherwise.
    ///
    /// # Errors
    ///
    /// See [`AnalyzerConfig::load`].
    pub fn load_or_default(path: Option<&Path,>,) -> Result<Self, Error,>
    {
        match path {
            Some(path,) => Self::load(path,),
            None => Ok(Self::default(),),
        }
    }

    /// Checks invariants that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for blank URLs or hosts.
    pub fn validate(&self,) -> Result<(), Error,>
    {
        let base = self.api_base_url.trim();
        if base.is_empty() {
            return Err(Error::validation("api_base_url cannot be empty",),);
        }
        if !base.starts_with("https://",) && !base.starts_with("http://",) {
            return Err(Error::validation(format!(
                "api_base_url must be an http(s) URL, got '{base}'"
            ),),);
        }
        if self.web_host.trim().is_empty() {
            return Err(Error::validation("web_host cannot be empty",),);
        }
        if self.web_host.contains('/',) {
            return Err(Error::validation("web_host must be a bare host name",),);
        }

        Ok((),)
    }
}

fn default_api_base_url() -> String
{
    DEFAULT_API_BASE_URL.to_owned()
}

fn default_web_host() -> String
{
    DEFAULT_WEB_HOST.to_owned()
}

fn default_contributors_limit() -> u8
{
    DEFAULT_CONTRIBUTORS_LIMIT
}

fn deserialize_contributors_limit<'de, D,>(deserializer: D,) -> Result<u8, D::Error,>
where
    D: serde::Deserializer<'de,>,
{
    let value = u8::deserialize(deserializer,)?;
    if value == 0 || value > MAX_CONTRIBUTORS_LIMIT {
        return Err(serde::de::Error::custom("contributors_limit must be between 1 and 100",),);
    }
    Ok(value,)
}
