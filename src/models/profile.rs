use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub login: String,
    pub url: String,
    pub avatar_url: String,
}

/// Sidebar profile card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub avatar_url: String,
    pub name: Option<String>,
    pub login: String,
    pub bio: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    /// Only present when the user made it public
    pub email: Option<String>,
    pub website_url: Option<String>,
    pub twitter_username: Option<String>,
    pub followers: u32,
    pub following: u32,
    pub organizations: Vec<Organization>,
}

/// Counters shown on the profile tabs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileCounts {
    pub repo_count: u32,
    pub project_count: u32,
    pub package_count: u32,
    pub star_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularRepo {
    pub name: String,
    pub description: Option<String>,
    pub stargazer_count: u32,
    pub updated_at: String,
    pub url: String,
    pub language: Option<String>,
    pub language_color: Option<String>,
    pub is_fork: bool,
    pub parent_name_with_owner: Option<String>,
}
