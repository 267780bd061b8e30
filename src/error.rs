#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the insight aggregator crate."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free while still
//! exposing a thoroughly documented error surface for library consumers.

use std::path::{Path, PathBuf};

/// Unified error type returned by the aggregator, the configuration loader
/// and the CLI.
///
/// The first five variants form the domain taxonomy surfaced to callers of
/// [`Analyzer::analyze`](crate::Analyzer::analyze). None of them is retried by
/// this crate; callers decide whether to re-authenticate or wait.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// The supplied string does not parse into an owner/name pair.
    #[error("invalid repository reference: {message}")]
    InvalidReference {
        /// Human readable description of the rejected input.
        message: String
    },
    /// The hosting service reported the repository as missing or private.
    #[error("Repository not found or is private")]
    RepositoryNotFound,
    /// The hosting service rejected the supplied credential.
    #[error("Invalid or expired GitHub token")]
    InvalidCredential,
    /// The hosting service refused the request because a quota was exceeded.
    #[error("GitHub API rate limit exceeded")]
    RateLimited,
    /// Any other transport or response failure.
    #[error("source request failed (status {status:?}): {message}")]
    UnknownSource {
        /// Status code reported by the source, when a response was received.
        status:  Option<u16>,
        /// Underlying failure detail for diagnostics.
        message: String
    },
    /// Wraps I/O errors that occur while reading configuration files.
    #[error("failed to read configuration from {path:?}: {source}")]
    Io {
        /// Location of the configuration file.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps YAML decoding errors.
    #[error("failed to parse configuration: {source}")]
    Parse {
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error
    },
    /// Returned when configuration or request inputs violate invariants.
    #[error("invalid input: {message}")]
    Validation {
        /// Human readable message describing the validation problem.
        message: String
    },
    /// Wraps serialization errors when writing reports.
    #[error("failed to serialize report: {source}")]
    Serialize {
        /// Underlying serialization error.
        source: serde_json::Error
    },
    /// Returned when the HTTP client for the hosting service cannot be built.
    #[error("failed to initialize GitHub client: {message}")]
    Client {
        /// Human readable message describing the construction failure.
        message: String
    }
}

impl Error {
    /// Constructs an invalid reference error from the provided message.
    pub fn invalid_reference<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::InvalidReference {
            message: message.into()
        }
    }

    /// Constructs a validation error from the provided displayable value.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the validation failure.
    pub fn validation<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Validation {
            message: message.into()
        }
    }

    /// Classifies a failed source request by the status code it carried.
    ///
    /// `404` maps to [`Error::RepositoryNotFound`], `401` to
    /// [`Error::InvalidCredential`], `403` and `429` to
    /// [`Error::RateLimited`]. Everything else, including failures without a
    /// response, becomes [`Error::UnknownSource`] with the detail preserved.
    pub fn from_source_status<M>(status: Option<u16>, message: M) -> Self
    where
        M: Into<String>
    {
        match status {
            Some(404) => Self::RepositoryNotFound,
            Some(401) => Self::InvalidCredential,
            Some(403 | 429) => Self::RateLimited,
            status => Self::UnknownSource {
                status,
                message: message.into()
            }
        }
    }

    /// Reports whether an automatic retry could succeed.
    ///
    /// The aggregator never retries, so every variant answers `false`. The
    /// method exists so relaying layers do not have to encode that policy.
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// HTTP status a relaying layer should answer with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidReference {
                ..
            }
            | Self::Validation {
                ..
            } => 400,
            Self::RepositoryNotFound => 404,
            Self::InvalidCredential => 401,
            Self::RateLimited => 429,
            Self::UnknownSource {
                ..
            } => 502,
            Self::Io {
                ..
            }
            | Self::Parse {
                ..
            }
            | Self::Serialize {
                ..
            }
            | Self::Client {
                ..
            } => 500
        }
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// This method is primarily intended for CLI contexts where the variant
    /// name does not add value to end users. The returned string matches the
    /// [`std::fmt::Display`] implementation.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Parse {
            source
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialize {
            source
        }
    }
}

/// Creates an [`Error::Io`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Location of the configuration file that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source
    }
}
