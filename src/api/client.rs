use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde_json::Value;

use crate::config;
use crate::error::{Error, Result};
use crate::types::{Activity, Project, ProjectPayload, Statistics, Team, TeamList, UploadOutcome};
use crate::viewer::EnvKey;

use super::Backend;

/// Reqwest client for the FlipDocs REST backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config::config().api.request_timeout_secs))
            .build()
            .map_err(|e| Error::fetch(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Client pointed at the configured backend origin.
    pub fn from_config(token: Option<String>) -> Result<Self> {
        Self::new(config::config().api.base_url.clone(), token)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        builder
            .send()
            .await
            .map_err(|e| Error::fetch(format!("request failed: {e}")))
    }

    /// Legacy unscoped listing kept for interoperability with older
    /// deployments (`GET /projects/get/all`).
    pub async fn list_projects_public(&self, team_name: &str) -> Result<Vec<Project>> {
        let response = self
            .send(
                self.http
                    .get(self.url("/projects/get/all"))
                    .query(&[("team_name", team_name)]),
            )
            .await?;
        read_json(expect_success(response).await?).await
    }
}

/// Non-2xx listing/read response -> FetchError with the status attached.
async fn expect_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(Error::fetch_status(status.as_u16(), server_message(response).await))
}

/// Non-2xx mutation response -> SubmissionError carrying the server-provided
/// detail when present, a status-derived message otherwise. 404 stays
/// distinct so callers can report unknown identifiers.
async fn expect_accepted(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = server_message(response).await;
    if status == StatusCode::NOT_FOUND {
        return Err(Error::NotFound(message));
    }
    Err(Error::Submission { status: status.as_u16(), message })
}

/// Prefer the backend's own `detail`/`error`/`message` text.
async fn server_message(response: Response) -> String {
    let status = response.status();
    let fallback = || {
        format!(
            "server returned {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("error")
        )
    };

    match response.json::<Value>().await {
        Ok(body) => ["detail", "error", "message"]
            .iter()
            .find_map(|key| body.get(key).and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(fallback),
        Err(_) => fallback(),
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| Error::Format(format!("response body did not match the expected shape: {e}")))
}

#[async_trait]
impl Backend for ApiClient {
    async fn list_team_projects(&self, team_name: &str) -> Result<Vec<Project>> {
        let response = self
            .send(self.authorized(
                self.http
                    .get(self.url("/projects/team/get/all"))
                    .query(&[("team_name", team_name)]),
            ))
            .await?;
        read_json(expect_success(response).await?).await
    }

    async fn get_project(&self, uuid: &str) -> Result<Project> {
        let response = self
            .send(self.http.get(self.url(&format!("/projects/{uuid}"))))
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(format!("project '{uuid}' is unknown to the backend")));
        }
        read_json(expect_success(response).await?).await
    }

    async fn create_project(&self, payload: &ProjectPayload) -> Result<Project> {
        let response = self
            .send(self.authorized(self.http.post(self.url("/projects/add")).json(payload)))
            .await?;
        read_json(expect_accepted(response).await?).await
    }

    async fn update_project(&self, uuid: &str, payload: &ProjectPayload) -> Result<Project> {
        let response = self
            .send(self.authorized(
                self.http
                    .put(self.url(&format!("/projects/update/{uuid}")))
                    .json(payload),
            ))
            .await?;
        read_json(expect_accepted(response).await?).await
    }

    async fn delete_project(&self, uuid: &str) -> Result<()> {
        let response = self
            .send(self.authorized(self.http.delete(self.url(&format!("/projects/delete/{uuid}")))))
            .await?;
        expect_accepted(response).await?;
        Ok(())
    }

    async fn list_teams(&self) -> Result<Vec<Team>> {
        let response = self
            .send(self.authorized(self.http.get(self.url("/teams/get/all"))))
            .await?;
        let list: TeamList = read_json(expect_success(response).await?).await?;
        Ok(list.teams)
    }

    async fn create_team(&self, team_name: &str) -> Result<Team> {
        let response = self
            .send(self.authorized(
                self.http
                    .post(self.url("/teams/add"))
                    .json(&serde_json::json!({ "team_name": team_name })),
            ))
            .await?;
        read_json(expect_accepted(response).await?).await
    }

    async fn fetch_spec(&self, uuid: &str, env: EnvKey) -> Result<Value> {
        let response = self
            .send(self.authorized(
                self.http
                    .get(self.url(&format!("/swagger/get/{uuid}/{}", env.as_str()))),
            ))
            .await?;

        // 404 surfaces distinctly so the caller can show "not found"
        // messaging instead of a generic failure.
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(server_message(response).await));
        }

        let body: Value = read_json(expect_success(response).await?).await?;
        match body.get("swagger") {
            Some(spec) if !spec.is_null() => Ok(spec.clone()),
            _ => Err(Error::Format(
                "response lacks a recognizable specification payload".into(),
            )),
        }
    }

    async fn recent_activity(&self, k: usize) -> Result<Vec<Activity>> {
        let response = self
            .send(self.authorized(
                self.http
                    .get(self.url("/activities/recent"))
                    .query(&[("k", k.to_string())]),
            ))
            .await?;
        read_json(expect_success(response).await?).await
    }

    async fn statistics(&self) -> Result<Statistics> {
        let response = self
            .send(self.authorized(self.http.get(self.url("/statistics"))))
            .await?;
        read_json(expect_success(response).await?).await
    }

    async fn upload_csv(&self, filename: &str, content: Vec<u8>) -> Result<UploadOutcome> {
        let part = reqwest::multipart::Part::bytes(content)
            .file_name(filename.to_string())
            .mime_str("text/csv")
            .map_err(|e| Error::fetch(format!("invalid upload part: {e}")))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .send(self.authorized(self.http.post(self.url("/upload")).multipart(form)))
            .await?;
        let status = response.status();
        let body: Value = read_json(expect_success(response).await?).await?;

        if let Some(error) = body.get("error").and_then(Value::as_str) {
            return Err(Error::Submission { status: status.as_u16(), message: error.to_string() });
        }
        match body.get("message").and_then(Value::as_str) {
            Some(message) => Ok(UploadOutcome { message: message.to_string() }),
            None => Err(Error::Format("upload response carried neither message nor error".into())),
        }
    }
}
