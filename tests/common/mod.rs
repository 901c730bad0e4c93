//! In-process stub of the FlipDocs backend for integration tests.
//!
//! Speaks just enough of the real API surface for the client to be exercised
//! end to end: team-scoped listings, project CRUD, team directory, swagger
//! resolution, dashboard endpoints, and the CSV upload.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use flipdocs::types::Project;

#[derive(Default)]
pub struct Inner {
    pub projects: Vec<Project>,
    pub teams: Vec<String>,
    pub specs: HashMap<(String, String), Value>,
    pub activities: Vec<Value>,
    pub next_id: u64,
    /// When set, team listings fail with a 500 so retry behavior can be tested.
    pub fail_listings: bool,
    pub listing_calls: usize,
}

#[derive(Clone, Default)]
pub struct StubState {
    inner: Arc<Mutex<Inner>>,
}

impl StubState {
    pub fn with_inner<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> R {
        f(&mut self.inner.lock().unwrap())
    }

    pub fn seed_project(&self, name: &str, team: &str, prod: &str, preprod: &str, pg: &str) -> String {
        self.with_inner(|inner| {
            inner.next_id += 1;
            let uuid = format!("stub-{}", inner.next_id);
            inner.projects.push(Project {
                uuid: uuid.clone(),
                projectname: name.to_string(),
                team_name: team.to_string(),
                prod_url: prod.to_string(),
                pre_prod_url: preprod.to_string(),
                pg_url: pg.to_string(),
            });
            uuid
        })
    }

    pub fn seed_spec(&self, uuid: &str, env: &str, doc: Value) {
        self.with_inner(|inner| {
            inner.specs.insert((uuid.to_string(), env.to_string()), doc);
        });
    }

    pub fn project_count(&self) -> usize {
        self.with_inner(|inner| inner.projects.len())
    }

    pub fn listing_calls(&self) -> usize {
        self.with_inner(|inner| inner.listing_calls)
    }

    pub fn set_fail_listings(&self, fail: bool) {
        self.with_inner(|inner| inner.fail_listings = fail);
    }
}

pub struct StubServer {
    pub base_url: String,
    pub state: StubState,
}

pub async fn spawn() -> anyhow::Result<StubServer> {
    let state = StubState::default();

    let app = Router::new()
        .route("/projects/team/get/all", get(list_team_projects))
        .route("/projects/get/all", get(list_team_projects))
        .route("/projects/:uuid", get(get_project))
        .route("/projects/add", post(add_project))
        .route("/projects/update/:uuid", put(update_project))
        .route("/projects/delete/:uuid", delete(delete_project))
        .route("/teams/get/all", get(list_teams))
        .route("/teams/add", post(add_team))
        .route("/swagger/get/:uuid/:env", get(get_swagger))
        .route("/activities/recent", get(recent_activities))
        .route("/statistics", get(statistics))
        .route("/upload", post(upload_csv))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let base_url = format!("http://{}", listener.local_addr()?);
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server");
    });

    Ok(StubServer { base_url, state })
}

fn not_found(detail: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": detail }))).into_response()
}

async fn list_team_projects(
    State(state): State<StubState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let team = params.get("team_name").cloned().unwrap_or_default();
    state.with_inner(|inner| {
        inner.listing_calls += 1;
        if inner.fail_listings {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": "database unavailable" })),
            )
                .into_response();
        }
        let projects: Vec<_> = inner
            .projects
            .iter()
            .filter(|p| p.team_name == team)
            .cloned()
            .collect();
        Json(projects).into_response()
    })
}

async fn get_project(State(state): State<StubState>, Path(uuid): Path<String>) -> Response {
    state.with_inner(|inner| {
        match inner.projects.iter().find(|p| p.uuid == uuid) {
            Some(project) => Json(project.clone()).into_response(),
            None => not_found("Project not found"),
        }
    })
}

async fn add_project(State(state): State<StubState>, Json(body): Json<Value>) -> Response {
    let name = body["projectname"].as_str().unwrap_or_default().to_string();
    state.with_inner(|inner| {
        if inner.projects.iter().any(|p| p.projectname == name) {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "detail": "Project already exists" })),
            )
                .into_response();
        }
        inner.next_id += 1;
        let project = Project {
            uuid: format!("stub-{}", inner.next_id),
            projectname: name,
            team_name: body["team_name"].as_str().unwrap_or_default().to_string(),
            prod_url: body["prod_url"].as_str().unwrap_or_default().to_string(),
            pre_prod_url: body["pre_prod_url"].as_str().unwrap_or_default().to_string(),
            pg_url: body["pg_url"].as_str().unwrap_or_default().to_string(),
        };
        inner.projects.push(project.clone());
        Json(project).into_response()
    })
}

async fn update_project(
    State(state): State<StubState>,
    Path(uuid): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    state.with_inner(|inner| {
        match inner.projects.iter_mut().find(|p| p.uuid == uuid) {
            Some(project) => {
                project.projectname = body["projectname"].as_str().unwrap_or_default().to_string();
                project.prod_url = body["prod_url"].as_str().unwrap_or_default().to_string();
                project.pre_prod_url =
                    body["pre_prod_url"].as_str().unwrap_or_default().to_string();
                project.pg_url = body["pg_url"].as_str().unwrap_or_default().to_string();
                Json(project.clone()).into_response()
            }
            None => not_found("Project not found"),
        }
    })
}

async fn delete_project(State(state): State<StubState>, Path(uuid): Path<String>) -> Response {
    state.with_inner(|inner| {
        let before = inner.projects.len();
        inner.projects.retain(|p| p.uuid != uuid);
        if inner.projects.len() == before {
            return not_found("Project not found");
        }
        Json(json!({ "message": "deleted" })).into_response()
    })
}

async fn list_teams(State(state): State<StubState>) -> Response {
    state.with_inner(|inner| {
        let teams: Vec<_> = inner
            .teams
            .iter()
            .enumerate()
            .map(|(i, name)| json!({ "team_id": format!("team-{}", i + 1), "team_name": name }))
            .collect();
        Json(json!({ "teams": teams })).into_response()
    })
}

async fn add_team(State(state): State<StubState>, Json(body): Json<Value>) -> Response {
    let name = body["team_name"].as_str().unwrap_or_default().to_string();
    state.with_inner(|inner| {
        if inner.teams.contains(&name) {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "detail": "Team already exists" })),
            )
                .into_response();
        }
        inner.teams.push(name.clone());
        let id = format!("team-{}", inner.teams.len());
        Json(json!({ "team_id": id, "team_name": name })).into_response()
    })
}

async fn get_swagger(
    State(state): State<StubState>,
    Path((uuid, env)): Path<(String, String)>,
) -> Response {
    // A seeded "malformed" key answers without a swagger field so the client's
    // shape check can be exercised.
    state.with_inner(|inner| {
        if uuid == "malformed" {
            return Json(json!({ "service": "broken", "id": uuid })).into_response();
        }
        match inner.specs.get(&(uuid, env)) {
            Some(doc) => Json(json!({ "swagger": doc })).into_response(),
            None => not_found("Project not found"),
        }
    })
}

async fn recent_activities(
    State(state): State<StubState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let k: usize = params
        .get("k")
        .and_then(|v| v.parse().ok())
        .unwrap_or(5);
    state.with_inner(|inner| {
        let feed: Vec<_> = inner.activities.iter().take(k).cloned().collect();
        Json(feed).into_response()
    })
}

async fn statistics(State(state): State<StubState>) -> Response {
    state.with_inner(|inner| {
        Json(json!({ "registered_projects": inner.projects.len() })).into_response()
    })
}

async fn upload_csv(State(state): State<StubState>, mut multipart: Multipart) -> Response {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.unwrap_or_default();
            if filename.starts_with("bad") {
                return Json(json!({ "error": "CSV file is required" })).into_response();
            }
            // Count data rows so tests can assert the file arrived intact.
            let rows = bytes.split(|b| *b == b'\n').filter(|l| !l.is_empty()).count();
            let imported = rows.saturating_sub(1);
            state.with_inner(|inner| inner.next_id += imported as u64);
            return Json(json!({
                "message": "Projects uploaded and processed successfully."
            }))
            .into_response();
        }
    }
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "detail": "CSV file is required" })),
    )
        .into_response()
}
