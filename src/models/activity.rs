use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Repository identity as shown on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryRef {
    pub name_with_owner: String,
    pub url: String,
}

/// One row of a `*ContributionsByRepository` list. Either half may be missing
/// in upstream data; such rows are skipped during aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoContributionEntry {
    pub repository: Option<RepositoryRef>,
    pub latest_contribution_at: Option<DateTime<Utc>>,
}

/// One repository-creation event from `repositoryContributions`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoCreationEntry {
    pub repository: Option<RepositoryRef>,
    pub occurred_at: Option<DateTime<Utc>>,
}

/// Every source the repository ranking merges
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContributionSources {
    pub by_commit: Vec<RepoContributionEntry>,
    pub by_pr: Vec<RepoContributionEntry>,
    pub by_issue: Vec<RepoContributionEntry>,
    pub by_review: Vec<RepoContributionEntry>,
    pub repo_creations: Vec<RepoCreationEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoContributionRecord {
    pub name_with_owner: String,
    pub url: String,
    pub occurred_at: DateTime<Utc>,
}

/// Body of `/api/activity-contribs`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRepos {
    pub top: Vec<RepositoryRef>,
    pub extra_count: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityTotals {
    pub commits: u32,
    pub issues: u32,
    pub prs: u32,
    pub reviews: u32,
}

impl ActivityTotals {
    pub fn sum(&self) -> u64 {
        u64::from(self.commits)
            + u64::from(self.issues)
            + u64::from(self.prs)
            + u64::from(self.reviews)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityPercentages {
    pub commits: u32,
    pub issues: u32,
    pub prs: u32,
    pub reviews: u32,
}

/// Body of `/api/activity-mix`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityMix {
    pub totals: ActivityTotals,
    pub percentages: ActivityPercentages,
}
