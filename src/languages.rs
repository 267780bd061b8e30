// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Language composition derived from raw per-language byte counts.

use serde::{Deserialize, Serialize};

/// Per-language byte counts in the order the source reported them.
pub type LanguageBytes = Vec<(String, u64,),>;

/// Share of a single language in the repository's code base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
pub struct LanguageShare
{
    /// Language name as reported by the source.
    pub name:       String,
    /// Bytes of code written in the language.
    pub bytes:      u64,
    /// Share of the total formatted with exactly one decimal digit.
    pub percentage: String,
}

/// Converts raw byte counts into a ranked, percentage-normalized list.
///
/// Entries are sorted by bytes descending; equal counts keep their original
/// order. When the total is zero every entry reports `"0.0"`.
///
/// # Example
///
/// ```
/// use repo_insight::distribute;
///
/// let shares = distribute(&[("Python".to_owned(), 100,), ("JavaScript".to_owned(), 300,),],);
/// assert_eq!(shares[0].name, "JavaScript");
/// assert_eq!(shares[0].percentage, "75.0");
/// assert_eq!(shares[1].percentage, "25.0");
/// ```
pub fn distribute(languages: &[(String, u64,)],) -> Vec<LanguageShare,>
{
    let total = languages.iter().fold(0u64, |sum, (_, bytes,)| sum.saturating_add(*bytes,),);

    let mut shares: Vec<LanguageShare,> = languages
        .iter()
        .map(|(name, bytes,)| LanguageShare {
            name:       name.clone(),
            bytes:      *bytes,
            percentage: format_percentage(*bytes, total,),
        },)
        .collect();

    shares.sort_by(|left, right| right.bytes.cmp(&left.bytes,),);
    shares
}

fn format_percentage(bytes: u64, total: u64,) -> String
{
    if total == 0 {
        return "0.0".to_owned();
    }

    format!("{:.1}", bytes as f64 * 100.0 / total as f64)
}
