// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Parsing of user-supplied repository references.
//!
//! A reference is a host-qualified repository URL such as
//! `https://github.com/owner/name`. Trailing `.git` suffixes and a trailing
//! slash are tolerated so values copied from clone dialogs and browser address
//! bars normalize to the same pair.

use std::fmt;

use regex::Regex;
use serde::Serialize;

use crate::error::Error;

/// Web host accepted when no override is configured.
pub const DEFAULT_WEB_HOST: &str = "github.com";

const OWNER_PATTERN: &str = "[A-Za-z0-9_-]+";
const NAME_PATTERN: &str = "[A-Za-z0-9_.-]+";

/// Canonical owner/name pair identifying a repository.
///
/// Both segments are non-empty and restricted to the characters the hosting
/// service accepts in account and repository names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize,)]
pub struct RepositoryRef
{
    owner: String,
    name:  String,
}

impl RepositoryRef
{
    /// Account that owns the repository.
    pub fn owner(&self,) -> &str
    {
        &self.owner
    }

    /// Repository name without any `.git` suffix.
    pub fn name(&self,) -> &str
    {
        &self.name
    }
}

impl fmt::Display for RepositoryRef
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Normalizes a repository URL on the default web host.
///
/// # Errors
///
/// Returns [`Error::InvalidReference`] when the cleaned input is not a
/// `http(s)://[www.]github.com/<owner>/<name>` URL.
///
/// # Examples
///
/// ```
/// use repo_insight::normalize;
///
/// let reference = normalize("https://github.com/octocat/hello-world.git",)?;
/// assert_eq!(reference.owner(), "octocat");
/// assert_eq!(reference.name(), "hello-world");
/// # Ok::<(), repo_insight::Error>(())
/// ```
pub fn normalize(raw: &str,) -> Result<RepositoryRef, Error,>
{
    normalize_for_host(raw, DEFAULT_WEB_HOST,)
}

/// Normalizes a repository URL against the provided web host.
///
/// The host is matched literally and case-insensitively, with an optional
/// `www.` prefix. Host names are case-insensitive in URLs, so
/// `https://GitHub.com/a/b` is accepted even though the web form of the
/// service only ever emits the lowercase host.
///
/// # Errors
///
/// Returns [`Error::InvalidReference`] when the input does not match, and
/// [`Error::Validation`] when the host itself is blank.
pub fn normalize_for_host(raw: &str, host: &str,) -> Result<RepositoryRef, Error,>
{
    let host = host.trim();
    if host.is_empty() {
        return Err(Error::validation("web host cannot be empty",),);
    }

    let pattern = reference_pattern(host,)
        .map_err(|error| Error::validation(format!("invalid web host '{host}': {error}"),),)?;
    parse_with(&pattern, raw,)
}

fn reference_pattern(host: &str,) -> Result<Regex, regex::Error,>
{
    Regex::new(&format!(
        r"^https?://(?:www\.)?(?i:{host})/({OWNER_PATTERN})/({NAME_PATTERN})$",
        host = regex::escape(host,),
    ),)
}

fn parse_with(pattern: &Regex, raw: &str,) -> Result<RepositoryRef, Error,>
{
    let trimmed = raw.trim();
    let without_suffix = trimmed.strip_suffix(".git",).unwrap_or(trimmed,);
    let cleaned = without_suffix.strip_suffix('/',).unwrap_or(without_suffix,);

    let captures = pattern
        .captures(cleaned,)
        .ok_or_else(|| Error::invalid_reference("Invalid GitHub repository URL",),)?;

    let owner = captures.get(1,).map(|segment| segment.as_str(),).unwrap_or_default();
    let name = captures.get(2,).map(|segment| segment.as_str(),).unwrap_or_default();

    if owner.is_empty() || name.is_empty() {
        return Err(Error::invalid_reference(
            "Could not extract owner and repository from URL",
        ),);
    }

    Ok(RepositoryRef {
        owner: owner.to_owned(), name: name.to_owned(),
    },)
}
