//! HTTP surface of the FlipDocs backend.
//!
//! `Backend` is the seam the core components talk through; `ApiClient` is the
//! reqwest implementation against the real REST API. The cache, viewer, and
//! mutation flow stay network-free behind the trait.

mod client;

pub use client::ApiClient;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::types::{Activity, Project, ProjectPayload, Statistics, Team, UploadOutcome};
use crate::viewer::EnvKey;

#[async_trait]
pub trait Backend: Send + Sync {
    /// Team-scoped project listing (`GET /projects/team/get/all`).
    async fn list_team_projects(&self, team_name: &str) -> Result<Vec<Project>>;

    /// Single project by identifier (`GET /projects/{uuid}`).
    async fn get_project(&self, uuid: &str) -> Result<Project>;

    /// `POST /projects/add`.
    async fn create_project(&self, payload: &ProjectPayload) -> Result<Project>;

    /// `PUT /projects/update/{uuid}`.
    async fn update_project(&self, uuid: &str, payload: &ProjectPayload) -> Result<Project>;

    /// `DELETE /projects/delete/{uuid}`.
    async fn delete_project(&self, uuid: &str) -> Result<()>;

    /// `GET /teams/get/all`.
    async fn list_teams(&self) -> Result<Vec<Team>>;

    /// `POST /teams/add`.
    async fn create_team(&self, team_name: &str) -> Result<Team>;

    /// Resolved specification document (`GET /swagger/get/{uuid}/{envKey}`).
    async fn fetch_spec(&self, uuid: &str, env: EnvKey) -> Result<Value>;

    /// `GET /activities/recent?k=`.
    async fn recent_activity(&self, k: usize) -> Result<Vec<Activity>>;

    /// `GET /statistics`.
    async fn statistics(&self) -> Result<Statistics>;

    /// Bulk CSV import (`POST /upload`, multipart field `file`).
    async fn upload_csv(&self, filename: &str, content: Vec<u8>) -> Result<UploadOutcome>;
}
