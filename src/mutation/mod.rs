//! Project and team mutation flow.
//!
//! Validation happens entirely client-side and short-circuits before any
//! request is built; only a clean draft reaches the backend. Callers are
//! responsible for reconciling successful mutations into the directory cache
//! via `DirectoryCache::invalidate`.

use url::Url;

use crate::api::Backend;
use crate::error::{Error, FieldError, Result};
use crate::types::{Project, ProjectPayload, Team};

/// User input for creating or updating a project.
#[derive(Debug, Clone, Default)]
pub struct ProjectDraft {
    pub projectname: String,
    pub team_name: String,
    pub prod_url: String,
    pub pre_prod_url: String,
    pub pg_url: String,
}

impl ProjectDraft {
    /// Validate the draft. `known_teams` is `Some` for admin-scoped callers,
    /// whose team must come from the directory rather than free text;
    /// non-admin callers have their team fixed by their identity.
    pub fn validate(&self, known_teams: Option<&[Team]>) -> Result<()> {
        let mut fields = Vec::new();

        if self.projectname.trim().is_empty() {
            fields.push(FieldError::new("projectname", "project name is required"));
        }

        let urls = [
            ("prod_url", self.prod_url.trim()),
            ("pre_prod_url", self.pre_prod_url.trim()),
            ("pg_url", self.pg_url.trim()),
        ];
        if urls.iter().all(|(_, url)| url.is_empty()) {
            fields.push(FieldError::new("url", "at least one environment URL is required"));
        }
        for (field, url) in urls {
            if !url.is_empty() && !is_absolute_http_url(url) {
                fields.push(FieldError::new(field, "must be an absolute http(s) URL"));
            }
        }

        if let Some(teams) = known_teams {
            if !teams.iter().any(|t| t.team_name == self.team_name) {
                fields.push(FieldError::new(
                    "team_name",
                    "team must be selected from the known team directory",
                ));
            }
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(fields))
        }
    }

    fn to_payload(&self) -> ProjectPayload {
        // Empty strings on the wire, never nulls; the backend expects them.
        ProjectPayload {
            projectname: self.projectname.trim().to_string(),
            team_name: self.team_name.clone(),
            pre_prod_url: self.pre_prod_url.trim().to_string(),
            prod_url: self.prod_url.trim().to_string(),
            pg_url: self.pg_url.trim().to_string(),
        }
    }
}

fn is_absolute_http_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.has_host(),
        Err(_) => false,
    }
}

/// Validate and submit a new project. The returned record carries the
/// server-assigned identifier.
pub async fn create_project(
    backend: &impl Backend,
    draft: &ProjectDraft,
    known_teams: Option<&[Team]>,
) -> Result<Project> {
    draft.validate(known_teams)?;
    let created = backend.create_project(&draft.to_payload()).await?;
    tracing::info!(project = %created.projectname, team = %created.team_name, "project created");
    Ok(created)
}

/// Validate and submit an update to an existing project.
pub async fn update_project(
    backend: &impl Backend,
    uuid: &str,
    draft: &ProjectDraft,
    known_teams: Option<&[Team]>,
) -> Result<Project> {
    draft.validate(known_teams)?;
    let updated = backend.update_project(uuid, &draft.to_payload()).await?;
    tracing::info!(project = %updated.projectname, "project updated");
    Ok(updated)
}

/// Delete a project after an exact, case-sensitive confirmation of its name.
/// A mismatch never reaches the network.
pub async fn delete_project(
    backend: &impl Backend,
    uuid: &str,
    confirmation_text: &str,
    expected_name: &str,
) -> Result<()> {
    if confirmation_text != expected_name {
        return Err(Error::ConfirmationMismatch);
    }
    backend.delete_project(uuid).await?;
    tracing::info!(project = %expected_name, "project deleted");
    Ok(())
}

/// Validate and submit a new team.
pub async fn create_team(backend: &impl Backend, name: &str) -> Result<Team> {
    if name.trim().is_empty() {
        return Err(Error::Validation(vec![FieldError::new(
            "team_name",
            "team name is required",
        )]));
    }
    backend.create_team(name.trim()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewer::EnvKey;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend stub that counts every call and never expects to be reached
    /// for inputs that fail client-side.
    #[derive(Default)]
    struct CountingBackend {
        calls: AtomicUsize,
    }

    impl CountingBackend {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn bump(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl Backend for CountingBackend {
        async fn list_team_projects(&self, _team: &str) -> Result<Vec<Project>> {
            self.bump();
            Ok(vec![])
        }
        async fn get_project(&self, uuid: &str) -> Result<Project> {
            self.bump();
            Err(Error::NotFound(uuid.to_string()))
        }
        async fn create_project(&self, payload: &ProjectPayload) -> Result<Project> {
            self.bump();
            Ok(Project {
                uuid: "assigned-1".into(),
                projectname: payload.projectname.clone(),
                team_name: payload.team_name.clone(),
                prod_url: payload.prod_url.clone(),
                pre_prod_url: payload.pre_prod_url.clone(),
                pg_url: payload.pg_url.clone(),
            })
        }
        async fn update_project(&self, uuid: &str, payload: &ProjectPayload) -> Result<Project> {
            self.bump();
            Ok(Project {
                uuid: uuid.into(),
                projectname: payload.projectname.clone(),
                team_name: payload.team_name.clone(),
                prod_url: payload.prod_url.clone(),
                pre_prod_url: payload.pre_prod_url.clone(),
                pg_url: payload.pg_url.clone(),
            })
        }
        async fn delete_project(&self, _uuid: &str) -> Result<()> {
            self.bump();
            Ok(())
        }
        async fn list_teams(&self) -> Result<Vec<Team>> {
            self.bump();
            Ok(vec![])
        }
        async fn create_team(&self, team_name: &str) -> Result<Team> {
            self.bump();
            Ok(Team { team_id: "t-1".into(), team_name: team_name.into() })
        }
        async fn fetch_spec(&self, _uuid: &str, _env: EnvKey) -> Result<Value> {
            self.bump();
            Ok(Value::Null)
        }
        async fn recent_activity(&self, _k: usize) -> Result<Vec<crate::types::Activity>> {
            self.bump();
            Ok(vec![])
        }
        async fn statistics(&self) -> Result<crate::types::Statistics> {
            self.bump();
            Ok(crate::types::Statistics { registered_projects: 0 })
        }
        async fn upload_csv(&self, _f: &str, _c: Vec<u8>) -> Result<crate::types::UploadOutcome> {
            self.bump();
            Ok(crate::types::UploadOutcome { message: "ok".into() })
        }
    }

    fn draft(name: &str, prod: &str) -> ProjectDraft {
        ProjectDraft {
            projectname: name.into(),
            team_name: "TnS".into(),
            prod_url: prod.into(),
            ..ProjectDraft::default()
        }
    }

    #[tokio::test]
    async fn empty_name_fails_without_network() {
        let backend = CountingBackend::default();
        let err = create_project(&backend, &draft("", "https://a.example/spec.json"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.field_errors().contains_key("projectname"));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn bad_production_url_is_cited_by_field() {
        let backend = CountingBackend::default();
        let err = create_project(&backend, &draft("Foo", "not-a-url"), None)
            .await
            .unwrap_err();
        assert!(err.field_errors().contains_key("prod_url"));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn all_urls_empty_is_rejected() {
        let backend = CountingBackend::default();
        let err = create_project(&backend, &draft("Foo", ""), None).await.unwrap_err();
        assert!(err.field_errors().contains_key("url"));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn admin_must_pick_a_known_team() {
        let backend = CountingBackend::default();
        let teams = vec![Team { team_id: "1".into(), team_name: "Payments".into() }];
        let err = create_project(&backend, &draft("Foo", "https://a.example/s.json"), Some(&teams))
            .await
            .unwrap_err();
        assert!(err.field_errors().contains_key("team_name"));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn valid_draft_submits_once_and_returns_assigned_id() {
        let backend = CountingBackend::default();
        let created = create_project(&backend, &draft("Foo", "https://a.example/s.json"), None)
            .await
            .unwrap();
        assert_eq!(created.uuid, "assigned-1");
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn delete_confirmation_must_match_exactly() {
        let backend = CountingBackend::default();

        let err = delete_project(&backend, "u-1", "Foo", "Foobar").await.unwrap_err();
        assert!(matches!(err, Error::ConfirmationMismatch));
        let err = delete_project(&backend, "u-1", "foobar", "Foobar").await.unwrap_err();
        assert!(matches!(err, Error::ConfirmationMismatch));
        assert_eq!(backend.calls(), 0);

        delete_project(&backend, "u-1", "Foobar", "Foobar").await.unwrap();
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn team_name_is_trimmed_and_required() {
        let backend = CountingBackend::default();
        assert!(matches!(
            create_team(&backend, "   ").await.unwrap_err(),
            Error::Validation(_)
        ));
        assert_eq!(backend.calls(), 0);

        let team = create_team(&backend, " Payments ").await.unwrap();
        assert_eq!(team.team_name, "Payments");
    }
}
