// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Rule-based verdict over aggregated repository metrics.
//!
//! Rules live in a single ordered table and the first matching rule wins.
//! More specific rules precede the general ones that would shadow them, and
//! the final rule matches everything so evaluation always produces a verdict.

use serde::Serialize;

/// Metrics the verdict rules are evaluated against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq,)]
pub struct VerdictInput
{
    /// Stargazer count.
    pub stars:        u64,
    /// Fork count.
    pub forks:        u64,
    /// Open issue count, pull requests included as the source reports them.
    pub open_issues:  u64,
    /// Resolved commit count.
    pub commits:      u64,
    /// Number of contributors returned by the contributor query.
    pub contributors: usize,
}

/// Narrative outcome selected by the rule chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize,)]
#[serde(rename_all = "snake_case")]
pub enum Verdict
{
    /// No stars and no forks.
    Lonely,
    /// Nobody forked the repository.
    NobodyForked,
    /// Fewer than five stars.
    FewStars,
    /// More than twice as many open issues as stars.
    IssueHeavy,
    /// Fewer than ten commits.
    LowCommits,
    /// One contributor and single-digit stars.
    SoloProject,
    /// Over a hundred stars but fewer than ten forks.
    StarsNoForks,
    /// Over a thousand stars.
    HighlyStarred,
    /// Over a hundred stars.
    ModeratelyStarred,
    /// Nothing stands out.
    Unremarkable,
}

type Rule = (Verdict, fn(&VerdictInput,) -> bool,);

/// Ordered rule table; position is rank.
const RULES: [Rule; 10] = [
    (Verdict::Lonely, |m| m.stars == 0 && m.forks == 0,),
    (Verdict::NobodyForked, |m| m.forks < 1,),
    (Verdict::FewStars, |m| m.stars < 5,),
    (Verdict::IssueHeavy, |m| m.open_issues > m.stars.saturating_mul(2,),),
    (Verdict::LowCommits, |m| m.commits < 10,),
    (Verdict::SoloProject, |m| m.contributors == 1 && m.stars < 10,),
    (Verdict::StarsNoForks, |m| m.stars > 100 && m.forks < 10,),
    (Verdict::HighlyStarred, |m| m.stars > 1000,),
    (Verdict::ModeratelyStarred, |m| m.stars > 100,),
    (Verdict::Unremarkable, |_| true,),
];

impl Verdict
{
    /// Text displayed for the verdict.
    pub fn message(self,) -> &'static str
    {
        match self {
            Self::Lonely => {
                "Zero stars, zero forks. This repo is lonelier than a developer on Valentine's Day."
            }
            Self::NobodyForked => {
                "Nobody wanted to fork this. Even your friends don't trust your code."
            }
            Self::FewStars => {
                "This repo has fewer stars than a cloudy night sky. Maybe add a README?"
            }
            Self::IssueHeavy => {
                "More issues than stars. This isn't a repository, it's a bug sanctuary."
            }
            Self::LowCommits => {
                "Less than 10 commits? Did you get distracted by another 'revolutionary' side \
                 project?"
            }
            Self::SoloProject => {
                "Solo project with single-digit stars. At least you're committed to your \
                 loneliness."
            }
            Self::StarsNoForks => {
                "People star it but won't fork it. Like a museum piece: nice to look at, too \
                 scary to touch."
            }
            Self::HighlyStarred => {
                "Look at you with over 1k stars! Still not making any money from it though, are \
                 you?"
            }
            Self::ModeratelyStarred => {
                "Pretty decent repo! You must have tweeted about it at least once."
            }
            Self::Unremarkable => {
                "Decent work. Not bad. Not great. Just\u{2026} there. Like most side projects."
            }
        }
    }
}

/// Returns the first verdict whose rule matches the metrics.
pub fn evaluate(input: &VerdictInput,) -> Verdict
{
    RULES
        .iter()
        .find(|(_, matches,)| matches(input,),)
        .map(|(verdict, _,)| *verdict,)
        .unwrap_or(Verdict::Unremarkable,)
}

/// Returns the narrative text of the first matching rule.
///
/// # Example
///
/// ```
/// use repo_insight::{Verdict, VerdictInput, classify};
///
/// let input = VerdictInput {
///     stars: 150, forks: 5, open_issues: 10, commits: 50, contributors: 3,
/// };
/// assert_eq!(classify(&input,), Verdict::StarsNoForks.message());
/// ```
pub fn classify(input: &VerdictInput,) -> &'static str
{
    evaluate(input,).message()
}
