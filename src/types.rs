use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered API project. Mirrors the backend wire format: unset
/// environment URLs are empty strings, not nulls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub uuid: String,
    pub projectname: String,
    #[serde(default)]
    pub team_name: String,
    #[serde(default)]
    pub prod_url: String,
    #[serde(default)]
    pub pre_prod_url: String,
    #[serde(default)]
    pub pg_url: String,
}

impl Project {
    pub fn has_any_url(&self) -> bool {
        !self.prod_url.trim().is_empty()
            || !self.pre_prod_url.trim().is_empty()
            || !self.pg_url.trim().is_empty()
    }
}

/// Request body for project create/update, as observed on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectPayload {
    pub projectname: String,
    pub team_name: String,
    pub pre_prod_url: String,
    pub prod_url: String,
    pub pg_url: String,
}

/// A named grouping of projects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Team {
    #[serde(default)]
    pub team_id: String,
    pub team_name: String,
}

/// Envelope returned by `GET /teams/get/all`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamList {
    pub teams: Vec<Team>,
}

/// One entry from the recent-activity feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub uuid: String,
    pub message: String,
    #[serde(alias = "timestamp")]
    pub time: DateTime<Utc>,
}

/// Aggregate counters from `GET /statistics`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statistics {
    #[serde(default)]
    pub registered_projects: u64,
}

/// Result of a bulk CSV import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadOutcome {
    pub message: String,
}
