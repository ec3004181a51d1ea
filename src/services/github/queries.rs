use serde_json::json;

use super::types::{
    parse_user, CalendarUser, CountsUser, MixUser, PopularReposUser, ProfileUser, ReposUser,
};
use super::{GraphQlClient, UpstreamError};
use crate::models::activity::{ActivityTotals, ContributionSources};
use crate::models::contribution::{ContributionCalendar, DateRange};
use crate::models::profile::{PopularRepo, Profile, ProfileCounts};

pub const CONTRIBUTION_CALENDAR_QUERY: &str = r#"
    query($login: String!, $from: DateTime!, $to: DateTime!) {
        user(login: $login) {
            contributionsCollection(from: $from, to: $to) {
                contributionCalendar {
                    totalContributions
                    weeks { contributionDays { date contributionCount contributionLevel } }
                }
            }
        }
    }
"#;

pub const ACTIVITY_MIX_QUERY: &str = r#"
    query ActivityMix($login: String!, $from: DateTime!, $to: DateTime!) {
        user(login: $login) {
            contributionsCollection(from: $from, to: $to) {
                totalCommitContributions
                totalIssueContributions
                totalPullRequestContributions
                totalPullRequestReviewContributions
            }
        }
    }
"#;

pub const ACTIVITY_REPOS_QUERY: &str = r#"
    query ActivityRepos($login: String!, $from: DateTime!, $to: DateTime!) {
        user(login: $login) {
            contributionsCollection(from: $from, to: $to) {
                commitContributionsByRepository(maxRepositories: 50) {
                    repository { nameWithOwner url }
                    contributions(first: 1) { nodes { occurredAt } }
                }
                pullRequestContributionsByRepository(maxRepositories: 50) {
                    repository { nameWithOwner url }
                    contributions(first: 1) { nodes { occurredAt } }
                }
                issueContributionsByRepository(maxRepositories: 50) {
                    repository { nameWithOwner url }
                    contributions(first: 1) { nodes { occurredAt } }
                }
                pullRequestReviewContributionsByRepository(maxRepositories: 50) {
                    repository { nameWithOwner url }
                    contributions(first: 1) { nodes { occurredAt } }
                }
                repositoryContributions(first: 50) {
                    nodes {
                        repository { nameWithOwner url }
                        occurredAt
                    }
                }
            }
        }
    }
"#;

pub const POPULAR_REPOS_QUERY: &str = r#"
    query UserTopPublicRepos($login: String!, $first: Int!) {
        user(login: $login) {
            repositories(first: $first, privacy: PUBLIC, orderBy: {field: UPDATED_AT, direction: DESC}) {
                nodes {
                    name
                    description
                    stargazerCount
                    updatedAt
                    url
                    isPrivate
                    primaryLanguage { name color }
                    isFork
                    parent { nameWithOwner }
                }
            }
        }
    }
"#;

pub const PROFILE_QUERY: &str = r#"
    query UserProfile($login: String!) {
        user(login: $login) {
            avatarUrl(size: 460)
            name
            login
            bio
            company
            location
            email
            websiteUrl
            twitterUsername
            followers { totalCount }
            following { totalCount }
            organizations(first: 12) {
                nodes {
                    login
                    url
                    avatarUrl(size: 80)
                }
            }
        }
    }
"#;

pub const PROFILE_COUNTS_QUERY: &str = r#"
    query ProfileCounts($login: String!) {
        user(login: $login) {
            repositories { totalCount }
            projectsV2(first: 0) { totalCount }
            packages { totalCount }
            starredRepositories { totalCount }
        }
    }
"#;

fn range_variables(login: &str, range: &DateRange) -> serde_json::Value {
    json!({
        "login": login,
        "from": range.from_rfc3339(),
        "to": range.to_rfc3339(),
    })
}

/// Daily contribution calendar for `login` within `range`
pub async fn fetch_contribution_calendar(
    client: &dyn GraphQlClient,
    login: &str,
    range: &DateRange,
) -> Result<ContributionCalendar, UpstreamError> {
    log::info!(
        "📅 Fetching contribution calendar for {} ({} to {})",
        login,
        range.from_rfc3339(),
        range.to_rfc3339()
    );

    let response = client
        .execute(CONTRIBUTION_CALENDAR_QUERY, range_variables(login, range))
        .await?;
    let user: CalendarUser = parse_user(response)?.ok_or(UpstreamError::UserNotFound)?;
    let calendar = ContributionCalendar::from(user);

    log::info!(
        "📊 GitHub returned {} calendar days ({} contributions)",
        calendar.contributions.len(),
        calendar.total_contributions
    );

    Ok(calendar)
}

/// Commit, issue, pull request and review counters for `login`
pub async fn fetch_activity_totals(
    client: &dyn GraphQlClient,
    login: &str,
    range: &DateRange,
) -> Result<ActivityTotals, UpstreamError> {
    log::info!(
        "Fetching activity mix for {} ({} to {})",
        login,
        range.from_rfc3339(),
        range.to_rfc3339()
    );

    let response = client
        .execute(ACTIVITY_MIX_QUERY, range_variables(login, range))
        .await?;
    let user: MixUser = parse_user(response)?.ok_or(UpstreamError::UserNotFound)?;

    Ok(ActivityTotals::from(user))
}

/// Every per-repository contribution list plus repository creations
pub async fn fetch_contribution_sources(
    client: &dyn GraphQlClient,
    login: &str,
    range: &DateRange,
) -> Result<ContributionSources, UpstreamError> {
    log::info!(
        "Fetching repositories contributed to by {} ({} to {})",
        login,
        range.from_rfc3339(),
        range.to_rfc3339()
    );

    let response = client
        .execute(ACTIVITY_REPOS_QUERY, range_variables(login, range))
        .await?;
    let user: ReposUser = parse_user(response)?.ok_or(UpstreamError::UserNotFound)?;

    Ok(ContributionSources::from(user))
}

/// Most recently updated public repositories. An unknown login yields an
/// empty list rather than an error.
pub async fn fetch_popular_repos(
    client: &dyn GraphQlClient,
    login: &str,
    first: u32,
) -> Result<Vec<PopularRepo>, UpstreamError> {
    log::info!("Fetching {} popular repositories for {}", first, login);

    let response = client
        .execute(POPULAR_REPOS_QUERY, json!({ "login": login, "first": first }))
        .await?;
    let repos = parse_user::<PopularReposUser>(response)?
        .map(Vec::<PopularRepo>::from)
        .unwrap_or_default();

    Ok(repos)
}

pub async fn fetch_profile(client: &dyn GraphQlClient, login: &str) -> Result<Profile, UpstreamError> {
    log::info!("Fetching profile for {}", login);

    let response = client
        .execute(PROFILE_QUERY, json!({ "login": login }))
        .await?;
    let user: ProfileUser = parse_user(response)?.ok_or(UpstreamError::UserNotFound)?;

    Ok(Profile::from(user))
}

pub async fn fetch_profile_counts(
    client: &dyn GraphQlClient,
    login: &str,
) -> Result<ProfileCounts, UpstreamError> {
    log::info!("Fetching profile counts for {}", login);

    let response = client
        .execute(PROFILE_COUNTS_QUERY, json!({ "login": login }))
        .await?;
    let user: CountsUser = parse_user(response)?.ok_or(UpstreamError::UserNotFound)?;

    Ok(ProfileCounts::from(user))
}
