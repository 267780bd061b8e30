// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Commit count derivation from a single-item pagination probe.
//!
//! The commit listing is requested with one item per page, so the page number
//! of the `rel="last"` link equals the number of commits on the default
//! branch.

/// Result of requesting the first page of commit history with `per_page=1`.
#[derive(Debug, Clone, Default, PartialEq, Eq,)]
pub struct CommitProbe
{
    /// Target of the `rel="last"` pagination link, when the source sent one.
    pub last_page_url: Option<String,>,
    /// Number of commit items present in the probe response.
    pub returned:      usize,
}

impl CommitProbe
{
    /// Builds a probe from a raw RFC 8288 `Link` header value.
    ///
    /// Only the `rel="last"` entry is retained; every other relation is
    /// ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use repo_insight::{CommitProbe, resolve_commit_count};
    ///
    /// let header = r#"<https://api.github.com/repositories/1/commits?per_page=1&page=2>; rel="next", <https://api.github.com/repositories/1/commits?per_page=1&page=42>; rel="last""#;
    /// let probe = CommitProbe::from_link_header(Some(header,), 1,);
    /// assert_eq!(resolve_commit_count(&probe,), 42);
    /// ```
    pub fn from_link_header(header: Option<&str,>, returned: usize,) -> Self
    {
        Self {
            last_page_url: header.and_then(last_link_target,), returned,
        }
    }
}

/// Resolves the total commit count from a probe.
///
/// Falls back to the number of returned items when no usable last-page link
/// is present. For repositories with more than one commit that fallback
/// understates the total; it is what the probe can observe.
pub fn resolve_commit_count(probe: &CommitProbe,) -> u64
{
    probe
        .last_page_url
        .as_deref()
        .and_then(page_number,)
        .unwrap_or(probe.returned as u64,)
}

fn last_link_target(header: &str,) -> Option<String,>
{
    header.split(',',).find_map(|entry| {
        let mut parts = entry.split(';',);
        let target = parts.next()?.trim();
        let is_last = parts.any(|param| {
            let param = param.trim();
            param == r#"rel="last""# || param == "rel=last"
        },);

        if !is_last {
            return None;
        }

        target.strip_prefix('<',)?.strip_suffix('>',).map(str::to_owned,)
    },)
}

fn page_number(url: &str,) -> Option<u64,>
{
    let (_, query,) = url.split_once('?',)?;
    let query = query.split('#',).next().unwrap_or_default();

    query
        .split('&',)
        .filter_map(|pair| pair.split_once('=',),)
        .find(|(key, _,)| *key == "page",)
        .and_then(|(_, value,)| value.parse::<u64,>().ok(),)
}
