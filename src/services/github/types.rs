//! Serde mirrors of the GitHub GraphQL responses.
//!
//! Nothing outside this module sees these shapes: every response is converted
//! into the dashboard models before it leaves the adapter.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::UpstreamError;
use crate::models::activity::{
    ActivityTotals, ContributionSources, RepoContributionEntry, RepoCreationEntry, RepositoryRef,
};
use crate::models::contribution::{ContributionCalendar, ContributionDay, ContributionLevel};
use crate::models::profile::{Organization, PopularRepo, Profile, ProfileCounts};

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: UserData<T>,
}

#[derive(Debug, Deserialize)]
struct UserData<T> {
    user: Option<T>,
}

/// Extract `data.user`, which GitHub sets to null for unknown logins
pub(super) fn parse_user<T: DeserializeOwned>(response: JsonValue) -> Result<Option<T>, UpstreamError> {
    serde_json::from_value::<GraphQlResponse<T>>(response)
        .map(|r| r.data.user)
        .map_err(|e| UpstreamError::Malformed(e.to_string()))
}

fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

#[derive(Debug, Deserialize)]
pub(super) struct Nodes<T> {
    nodes: Option<Vec<Option<T>>>,
}

impl<T> Nodes<T> {
    fn into_vec(self) -> Vec<T> {
        self.nodes.unwrap_or_default().into_iter().flatten().collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TotalCount {
    total_count: Option<u32>,
}

fn count_or_zero(count: Option<TotalCount>) -> u32 {
    count.and_then(|c| c.total_count).unwrap_or(0)
}

// contributionCalendar

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CalendarUser {
    contributions_collection: CalendarCollection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarCollection {
    contribution_calendar: RawCalendar,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCalendar {
    total_contributions: u32,
    weeks: Vec<RawWeek>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWeek {
    contribution_days: Vec<RawDay>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDay {
    date: NaiveDate,
    contribution_count: u32,
    contribution_level: ContributionLevel,
}

impl From<CalendarUser> for ContributionCalendar {
    fn from(user: CalendarUser) -> Self {
        let calendar = user.contributions_collection.contribution_calendar;
        let contributions = calendar
            .weeks
            .into_iter()
            .flat_map(|week| week.contribution_days)
            .map(|day| ContributionDay {
                date: day.date,
                value: day.contribution_count,
                level: day.contribution_level,
            })
            .collect();

        ContributionCalendar {
            total_contributions: calendar.total_contributions,
            contributions,
        }
    }
}

// Activity mix counters

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct MixUser {
    contributions_collection: MixCollection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MixCollection {
    total_commit_contributions: Option<u32>,
    total_issue_contributions: Option<u32>,
    total_pull_request_contributions: Option<u32>,
    total_pull_request_review_contributions: Option<u32>,
}

impl From<MixUser> for ActivityTotals {
    fn from(user: MixUser) -> Self {
        let collection = user.contributions_collection;
        ActivityTotals {
            commits: collection.total_commit_contributions.unwrap_or(0),
            issues: collection.total_issue_contributions.unwrap_or(0),
            prs: collection.total_pull_request_contributions.unwrap_or(0),
            reviews: collection.total_pull_request_review_contributions.unwrap_or(0),
        }
    }
}

// Repositories contributed to

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ReposUser {
    contributions_collection: ReposCollection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReposCollection {
    commit_contributions_by_repository: Option<Vec<RawRepoContributions>>,
    pull_request_contributions_by_repository: Option<Vec<RawRepoContributions>>,
    issue_contributions_by_repository: Option<Vec<RawRepoContributions>>,
    pull_request_review_contributions_by_repository: Option<Vec<RawRepoContributions>>,
    repository_contributions: Option<Nodes<RawRepoCreation>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRepository {
    name_with_owner: Option<String>,
    url: Option<String>,
}

impl RawRepository {
    fn into_ref(self) -> Option<RepositoryRef> {
        let name_with_owner = self.name_with_owner?;
        let url = self
            .url
            .unwrap_or_else(|| format!("https://github.com/{}", name_with_owner));
        Some(RepositoryRef {
            name_with_owner,
            url,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOccurrence {
    occurred_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRepoContributions {
    repository: Option<RawRepository>,
    contributions: Option<Nodes<RawOccurrence>>,
}

impl RawRepoContributions {
    /// GitHub lists contributions newest first, so the first node is the latest
    fn into_entry(self) -> RepoContributionEntry {
        let latest = self
            .contributions
            .and_then(|c| c.into_vec().into_iter().next())
            .and_then(|node| node.occurred_at);

        RepoContributionEntry {
            repository: self.repository.and_then(RawRepository::into_ref),
            latest_contribution_at: parse_timestamp(latest.as_deref()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRepoCreation {
    repository: Option<RawRepository>,
    occurred_at: Option<String>,
}

fn into_entries(list: Option<Vec<RawRepoContributions>>) -> Vec<RepoContributionEntry> {
    list.unwrap_or_default()
        .into_iter()
        .map(RawRepoContributions::into_entry)
        .collect()
}

impl From<ReposUser> for ContributionSources {
    fn from(user: ReposUser) -> Self {
        let collection = user.contributions_collection;
        let repo_creations = collection
            .repository_contributions
            .map(Nodes::into_vec)
            .unwrap_or_default()
            .into_iter()
            .map(|creation| RepoCreationEntry {
                repository: creation.repository.and_then(RawRepository::into_ref),
                occurred_at: parse_timestamp(creation.occurred_at.as_deref()),
            })
            .collect();

        ContributionSources {
            by_commit: into_entries(collection.commit_contributions_by_repository),
            by_pr: into_entries(collection.pull_request_contributions_by_repository),
            by_issue: into_entries(collection.issue_contributions_by_repository),
            by_review: into_entries(collection.pull_request_review_contributions_by_repository),
            repo_creations,
        }
    }
}

// Popular repositories

#[derive(Debug, Deserialize)]
pub(super) struct PopularReposUser {
    repositories: Option<Nodes<RawPopularRepo>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPopularRepo {
    name: String,
    description: Option<String>,
    #[serde(default)]
    stargazer_count: u32,
    updated_at: String,
    url: String,
    primary_language: Option<RawLanguage>,
    #[serde(default)]
    is_fork: bool,
    parent: Option<RawParent>,
}

#[derive(Debug, Deserialize)]
struct RawLanguage {
    name: Option<String>,
    color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawParent {
    name_with_owner: Option<String>,
}

impl From<PopularReposUser> for Vec<PopularRepo> {
    fn from(user: PopularReposUser) -> Self {
        user.repositories
            .map(Nodes::into_vec)
            .unwrap_or_default()
            .into_iter()
            .map(|repo| {
                let (language, language_color) = match repo.primary_language {
                    Some(lang) => (lang.name, lang.color),
                    None => (None, None),
                };
                PopularRepo {
                    name: repo.name,
                    description: repo.description,
                    stargazer_count: repo.stargazer_count,
                    updated_at: repo.updated_at,
                    url: repo.url,
                    language,
                    language_color,
                    is_fork: repo.is_fork,
                    parent_name_with_owner: repo.parent.and_then(|p| p.name_with_owner),
                }
            })
            .collect()
    }
}

// Profile

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ProfileUser {
    avatar_url: String,
    name: Option<String>,
    login: String,
    bio: Option<String>,
    company: Option<String>,
    location: Option<String>,
    email: Option<String>,
    website_url: Option<String>,
    twitter_username: Option<String>,
    followers: Option<TotalCount>,
    following: Option<TotalCount>,
    organizations: Option<Nodes<RawOrganization>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOrganization {
    login: String,
    url: String,
    avatar_url: String,
}

impl From<ProfileUser> for Profile {
    fn from(user: ProfileUser) -> Self {
        let organizations = user
            .organizations
            .map(Nodes::into_vec)
            .unwrap_or_default()
            .into_iter()
            .map(|org| Organization {
                login: org.login,
                url: org.url,
                avatar_url: org.avatar_url,
            })
            .collect();

        Profile {
            avatar_url: user.avatar_url,
            name: user.name,
            login: user.login,
            bio: user.bio,
            company: user.company,
            location: user.location,
            email: user.email,
            website_url: user.website_url,
            twitter_username: user.twitter_username,
            followers: count_or_zero(user.followers),
            following: count_or_zero(user.following),
            organizations,
        }
    }
}

// Profile tab counts

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CountsUser {
    repositories: Option<TotalCount>,
    #[serde(rename = "projectsV2")]
    projects_v2: Option<TotalCount>,
    packages: Option<TotalCount>,
    starred_repositories: Option<TotalCount>,
}

impl From<CountsUser> for ProfileCounts {
    fn from(user: CountsUser) -> Self {
        ProfileCounts {
            repo_count: count_or_zero(user.repositories),
            project_count: count_or_zero(user.projects_v2),
            package_count: count_or_zero(user.packages),
            star_count: count_or_zero(user.starred_repositories),
        }
    }
}
