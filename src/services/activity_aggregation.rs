use crate::models::activity::{
    ActivityMix, ActivityPercentages, ActivityRepos, ActivityTotals, ContributionSources,
    RepoContributionRecord, RepositoryRef,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Number of repositories listed by name on the activity overview
pub const TOP_REPOSITORY_COUNT: usize = 3;

/// Merge every contribution source into one record per repository.
///
/// A repository seen in several sources keeps the entry with the latest
/// timestamp, whichever source it came from. Entries without a repository or
/// timestamp are dropped. The result is ordered newest first; equal
/// timestamps fall back to `nameWithOwner` ascending.
pub fn merge_repo_contributions(sources: &ContributionSources) -> Vec<RepoContributionRecord> {
    let mut repo_map: HashMap<String, RepoContributionRecord> = HashMap::new();
    let mut skipped = 0usize;

    let by_repository = [
        ("commit", &sources.by_commit),
        ("pull request", &sources.by_pr),
        ("issue", &sources.by_issue),
        ("review", &sources.by_review),
    ];

    for (kind, entries) in by_repository {
        for entry in entries {
            match (&entry.repository, entry.latest_contribution_at) {
                (Some(repository), Some(occurred_at)) => {
                    keep_latest(&mut repo_map, repository, occurred_at)
                }
                _ => {
                    log::debug!("Skipping {} contribution without repository or timestamp", kind);
                    skipped += 1;
                }
            }
        }
    }

    // A repository created in range counts even when it has no other activity
    for creation in &sources.repo_creations {
        match (&creation.repository, creation.occurred_at) {
            (Some(repository), Some(occurred_at)) => {
                keep_latest(&mut repo_map, repository, occurred_at)
            }
            _ => {
                log::debug!("Skipping repository creation without repository or timestamp");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        log::debug!("Ignored {} malformed contribution entries", skipped);
    }

    let mut records: Vec<RepoContributionRecord> = repo_map.into_values().collect();
    records.sort_by(|a, b| {
        b.occurred_at
            .cmp(&a.occurred_at)
            .then_with(|| a.name_with_owner.cmp(&b.name_with_owner))
    });
    records
}

/// Rank the repositories a user contributed to and keep the top three
pub fn aggregate_activity_repos(sources: &ContributionSources) -> ActivityRepos {
    let records = merge_repo_contributions(sources);
    let total = records.len();

    let top = records
        .into_iter()
        .take(TOP_REPOSITORY_COUNT)
        .map(|record| RepositoryRef {
            name_with_owner: record.name_with_owner,
            url: record.url,
        })
        .collect();

    ActivityRepos {
        top,
        extra_count: total.saturating_sub(TOP_REPOSITORY_COUNT),
        total,
    }
}

/// Replace the stored record only when `occurred_at` is strictly later
fn keep_latest(
    repo_map: &mut HashMap<String, RepoContributionRecord>,
    repository: &RepositoryRef,
    occurred_at: DateTime<Utc>,
) {
    if let Some(existing) = repo_map.get(&repository.name_with_owner) {
        if existing.occurred_at >= occurred_at {
            return;
        }
    }

    repo_map.insert(
        repository.name_with_owner.clone(),
        RepoContributionRecord {
            name_with_owner: repository.name_with_owner.clone(),
            url: repository.url.clone(),
            occurred_at,
        },
    );
}

/// Share of each contribution category, in whole percent.
///
/// Each share is `round(100 * count / total)` using round-half-away-from-zero.
/// Shares are not renormalised, so they may add up to 99 or 101. An all-zero
/// input yields all-zero shares.
pub fn summarize_activity_mix(totals: ActivityTotals) -> ActivityMix {
    let total = totals.sum();
    if total == 0 {
        return ActivityMix {
            totals,
            percentages: ActivityPercentages::default(),
        };
    }

    let share = |count: u32| ((f64::from(count) / total as f64) * 100.0).round() as u32;

    ActivityMix {
        totals,
        percentages: ActivityPercentages {
            commits: share(totals.commits),
            issues: share(totals.issues),
            prs: share(totals.prs),
            reviews: share(totals.reviews),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity::{RepoContributionEntry, RepoCreationEntry};
    use chrono::TimeZone;

    fn repo(name: &str) -> RepositoryRef {
        RepositoryRef {
            name_with_owner: name.to_string(),
            url: format!("https://github.com/{}", name),
        }
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    fn entry(name: &str, when: DateTime<Utc>) -> RepoContributionEntry {
        RepoContributionEntry {
            repository: Some(repo(name)),
            latest_contribution_at: Some(when),
        }
    }

    fn creation(name: &str, when: DateTime<Utc>) -> RepoCreationEntry {
        RepoCreationEntry {
            repository: Some(repo(name)),
            occurred_at: Some(when),
        }
    }

    #[test]
    fn test_empty_sources() {
        let result = aggregate_activity_repos(&ContributionSources::default());
        assert_eq!(
            result,
            ActivityRepos {
                top: vec![],
                extra_count: 0,
                total: 0
            }
        );
    }

    #[test]
    fn test_latest_timestamp_wins_across_sources() {
        let sources = ContributionSources {
            by_commit: vec![entry("octo/widget", at(1, 9))],
            by_issue: vec![entry("octo/widget", at(5, 9))],
            ..Default::default()
        };

        let records = merge_repo_contributions(&sources);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name_with_owner, "octo/widget");
        assert_eq!(records[0].occurred_at, at(5, 9));
    }

    #[test]
    fn test_earlier_entry_does_not_replace_later_one() {
        let sources = ContributionSources {
            by_commit: vec![entry("octo/widget", at(9, 0))],
            by_review: vec![entry("octo/widget", at(2, 0))],
            repo_creations: vec![creation("octo/widget", at(1, 0))],
            ..Default::default()
        };

        let records = merge_repo_contributions(&sources);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].occurred_at, at(9, 0));
    }

    #[test]
    fn test_repository_in_all_sources_collapses_to_one() {
        let sources = ContributionSources {
            by_commit: vec![entry("octo/widget", at(1, 0))],
            by_pr: vec![entry("octo/widget", at(3, 0))],
            by_issue: vec![entry("octo/widget", at(2, 0))],
            by_review: vec![entry("octo/widget", at(4, 0))],
            repo_creations: vec![creation("octo/widget", at(7, 0))],
        };

        let result = aggregate_activity_repos(&sources);
        assert_eq!(result.total, 1);
        assert_eq!(result.extra_count, 0);
        assert_eq!(result.top, vec![repo("octo/widget")]);
        assert_eq!(merge_repo_contributions(&sources)[0].occurred_at, at(7, 0));
    }

    #[test]
    fn test_top_three_of_five_ordered_newest_first() {
        let sources = ContributionSources {
            by_commit: vec![entry("a/one", at(1, 0)), entry("a/two", at(2, 0))],
            by_pr: vec![entry("a/three", at(3, 0))],
            by_issue: vec![entry("a/four", at(4, 0))],
            repo_creations: vec![creation("a/five", at(5, 0))],
            ..Default::default()
        };

        let result = aggregate_activity_repos(&sources);
        assert_eq!(result.total, 5);
        assert_eq!(result.extra_count, 2);
        assert_eq!(
            result.top,
            vec![repo("a/five"), repo("a/four"), repo("a/three")]
        );
    }

    #[test]
    fn test_creation_only_repository_is_counted() {
        let sources = ContributionSources {
            repo_creations: vec![creation("octo/new-repo", at(12, 0))],
            ..Default::default()
        };

        let result = aggregate_activity_repos(&sources);
        assert_eq!(result.total, 1);
        assert_eq!(result.top, vec![repo("octo/new-repo")]);
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let sources = ContributionSources {
            by_commit: vec![
                RepoContributionEntry {
                    repository: None,
                    latest_contribution_at: Some(at(1, 0)),
                },
                RepoContributionEntry {
                    repository: Some(repo("octo/no-timestamp")),
                    latest_contribution_at: None,
                },
                entry("octo/valid", at(2, 0)),
            ],
            repo_creations: vec![RepoCreationEntry {
                repository: None,
                occurred_at: None,
            }],
            ..Default::default()
        };

        let result = aggregate_activity_repos(&sources);
        assert_eq!(result.total, 1);
        assert_eq!(result.top, vec![repo("octo/valid")]);
    }

    #[test]
    fn test_equal_timestamps_order_by_name() {
        let sources = ContributionSources {
            by_commit: vec![entry("zeta/repo", at(1, 0)), entry("alpha/repo", at(1, 0))],
            by_pr: vec![entry("mid/repo", at(1, 0))],
            ..Default::default()
        };

        let result = aggregate_activity_repos(&sources);
        assert_eq!(
            result.top,
            vec![repo("alpha/repo"), repo("mid/repo"), repo("zeta/repo")]
        );
    }

    #[test]
    fn test_activity_mix_all_zero() {
        let mix = summarize_activity_mix(ActivityTotals::default());
        assert_eq!(mix.percentages, ActivityPercentages::default());
        assert_eq!(mix.totals, ActivityTotals::default());
    }

    #[test]
    fn test_activity_mix_percentages() {
        let totals = ActivityTotals {
            commits: 3,
            issues: 1,
            prs: 0,
            reviews: 0,
        };
        let mix = summarize_activity_mix(totals);
        assert_eq!(
            mix.percentages,
            ActivityPercentages {
                commits: 75,
                issues: 25,
                prs: 0,
                reviews: 0
            }
        );
        assert_eq!(mix.totals, totals);
    }

    #[test]
    fn test_activity_mix_is_not_renormalised() {
        // 1/3 each rounds down to 33, summing to 99
        let mix = summarize_activity_mix(ActivityTotals {
            commits: 1,
            issues: 1,
            prs: 1,
            reviews: 0,
        });
        assert_eq!(mix.percentages.commits, 33);
        assert_eq!(mix.percentages.issues, 33);
        assert_eq!(mix.percentages.prs, 33);
        assert_eq!(mix.percentages.reviews, 0);
    }

    #[test]
    fn test_activity_mix_rounds_half_away_from_zero() {
        // 1/8 = 12.5% and 7/8 = 87.5%
        let mix = summarize_activity_mix(ActivityTotals {
            commits: 7,
            issues: 1,
            prs: 0,
            reviews: 0,
        });
        assert_eq!(mix.percentages.commits, 88);
        assert_eq!(mix.percentages.issues, 13);
    }
}
