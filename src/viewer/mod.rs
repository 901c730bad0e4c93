//! Project selection and environment resolution for the documentation viewer.
//!
//! Every surface that needs "which environments does this project have and
//! which one is active" goes through the pure functions here instead of
//! re-deriving the list inline. The `Viewer` state machine owns the selected
//! project and guards against stale fetch results being applied.

use serde_json::Value;

use crate::api::Backend;
use crate::error::{Error, Result};
use crate::types::Project;

/// Fixed environment slots, in preference order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvKey {
    Production,
    PreProduction,
    Playground,
}

impl EnvKey {
    pub const ALL: [EnvKey; 3] = [EnvKey::Production, EnvKey::PreProduction, EnvKey::Playground];

    /// Wire key used in request paths and query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::Production => "prod_url",
            EnvKey::PreProduction => "pre_prod_url",
            EnvKey::Playground => "pg_url",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EnvKey::Production => "Production",
            EnvKey::PreProduction => "Pre-production",
            EnvKey::Playground => "Playground",
        }
    }

    pub fn parse(s: &str) -> Option<EnvKey> {
        match s {
            "prod_url" | "prod" => Some(EnvKey::Production),
            "pre_prod_url" | "preprod" => Some(EnvKey::PreProduction),
            "pg_url" | "pg" | "playground" => Some(EnvKey::Playground),
            _ => None,
        }
    }

    fn url_of<'a>(&self, project: &'a Project) -> &'a str {
        match self {
            EnvKey::Production => &project.prod_url,
            EnvKey::PreProduction => &project.pre_prod_url,
            EnvKey::Playground => &project.pg_url,
        }
    }
}

/// A configured environment of a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub key: EnvKey,
    pub label: &'static str,
    pub url: String,
}

/// The environments a project actually has, preserving the fixed
/// {production, pre-production, playground} order.
pub fn resolve_environments(project: &Project) -> Vec<Environment> {
    EnvKey::ALL
        .iter()
        .filter(|key| !key.url_of(project).trim().is_empty())
        .map(|key| Environment {
            key: *key,
            label: key.label(),
            url: key.url_of(project).to_string(),
        })
        .collect()
}

/// Keep the previous selection if the project still has it, otherwise fall
/// back to the first configured environment. `None` means the project has no
/// configured environment at all.
pub fn pick_default_environment(project: &Project, previous: Option<EnvKey>) -> Option<Environment> {
    let resolved = resolve_environments(project);
    if let Some(prev) = previous {
        if let Some(env) = resolved.iter().find(|e| e.key == prev) {
            return Some(env.clone());
        }
    }
    resolved.into_iter().next()
}

/// Handle for an in-flight specification fetch. Results are applied back via
/// [`Viewer::apply_result`], which discards anything that no longer matches
/// the current selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecRequest {
    pub uuid: String,
    pub env: EnvKey,
    seq: u64,
}

/// Display state for the selected project's specification.
#[derive(Debug, Clone, PartialEq)]
pub enum SpecState {
    NoProject,
    /// Environments known, nothing loaded yet. Holds the active environment,
    /// or `None` when the project has no configured environment.
    EnvironmentsResolved(Option<EnvKey>),
    Loading(EnvKey),
    Loaded { env: EnvKey, spec: Value },
    Errored { env: EnvKey, message: String },
}

/// Per-selection state machine:
/// `NoProject -> EnvironmentsResolved -> {Loading -> Loaded | Loading -> Errored}`.
#[derive(Debug, Default)]
pub struct Viewer {
    project: Option<Project>,
    environments: Vec<Environment>,
    state: SpecState,
    next_seq: u64,
    current_seq: u64,
}

impl Default for SpecState {
    fn default() -> Self {
        SpecState::NoProject
    }
}

impl Viewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SpecState {
        &self.state
    }

    pub fn environments(&self) -> &[Environment] {
        &self.environments
    }

    /// Select a project, keeping the previous environment choice when the new
    /// project also has it. Returns the fetch to perform, or `None` when the
    /// project has no configured environment ("no valid environment").
    pub fn select_project(&mut self, project: Project) -> Option<SpecRequest> {
        let previous = self.active_env();
        self.environments = resolve_environments(&project);
        let default = pick_default_environment(&project, previous);
        self.project = Some(project);

        match default {
            Some(env) => Some(self.begin_load(env.key)),
            None => {
                self.state = SpecState::EnvironmentsResolved(None);
                None
            }
        }
    }

    /// Switch the active environment. Fails with the "no valid environment"
    /// signal if the selected project does not have the requested one.
    pub fn switch_env(&mut self, env: EnvKey) -> Result<SpecRequest> {
        let Some(project) = &self.project else {
            return Err(Error::fetch("no project selected"));
        };
        if !self.environments.iter().any(|e| e.key == env) {
            return Err(Error::NotFound(format!(
                "project '{}' has no valid environment for '{}'",
                project.projectname,
                env.as_str()
            )));
        }
        Ok(self.begin_load(env))
    }

    pub fn clear(&mut self) {
        self.project = None;
        self.environments.clear();
        self.state = SpecState::NoProject;
    }

    /// Apply a completed fetch. Results for a superseded request or a
    /// previously selected project are discarded, so a slow failure can never
    /// replace a view that has already moved on.
    pub fn apply_result(&mut self, request: SpecRequest, result: Result<Value>) {
        let relevant = request.seq == self.current_seq
            && self.project.as_ref().map(|p| p.uuid == request.uuid).unwrap_or(false);
        if !relevant {
            tracing::debug!(uuid = %request.uuid, "discarding stale specification result");
            return;
        }

        self.state = match result {
            Ok(spec) => SpecState::Loaded { env: request.env, spec },
            Err(err) => SpecState::Errored { env: request.env, message: err.to_string() },
        };
    }

    /// Convenience driver: run the fetch through the backend and apply it.
    pub async fn load(&mut self, backend: &impl Backend, request: SpecRequest) {
        let result = backend.fetch_spec(&request.uuid, request.env).await;
        self.apply_result(request, result);
    }

    fn begin_load(&mut self, env: EnvKey) -> SpecRequest {
        // Tagged with a sequence number so completions out of order resolve
        // in favor of the most recent request.
        self.next_seq += 1;
        self.current_seq = self.next_seq;
        self.state = SpecState::Loading(env);
        SpecRequest {
            uuid: self.project.as_ref().map(|p| p.uuid.clone()).unwrap_or_default(),
            env,
            seq: self.current_seq,
        }
    }

    fn active_env(&self) -> Option<EnvKey> {
        match &self.state {
            SpecState::EnvironmentsResolved(env) => *env,
            SpecState::Loading(env) => Some(*env),
            SpecState::Loaded { env, .. } => Some(*env),
            SpecState::Errored { env, .. } => Some(*env),
            SpecState::NoProject => None,
        }
    }
}
