use clap::{Args, Subcommand};
use serde_json::json;

use crate::api::Backend;
use crate::cli::utils::*;
use crate::cli::{OutputFormat, Session};
use crate::directory::DirectoryCache;
use crate::mutation::{self, ProjectDraft};
use crate::types::Project;

#[derive(Args, Debug, Clone)]
pub struct ProjectFields {
    #[arg(long, help = "Production swagger URL")]
    pub prod_url: Option<String>,

    #[arg(long, help = "Pre-production swagger URL")]
    pub pre_prod_url: Option<String>,

    #[arg(long, help = "Playground swagger URL")]
    pub pg_url: Option<String>,

    #[arg(long, help = "Owning team (defaults to your effective team)")]
    pub team: Option<String>,
}

#[derive(Subcommand)]
pub enum ProjectCommands {
    #[command(about = "List a team's projects")]
    List {
        #[arg(help = "Team name (defaults to your effective team)")]
        team: Option<String>,

        #[arg(long, help = "Use the legacy public listing endpoint")]
        public: bool,
    },

    #[command(about = "Show one project")]
    Get {
        #[arg(help = "Project UUID")]
        uuid: String,
    },

    #[command(about = "Register a new project")]
    Create {
        #[arg(help = "Project display name")]
        name: String,

        #[command(flatten)]
        fields: ProjectFields,
    },

    #[command(about = "Update an existing project")]
    Update {
        #[arg(help = "Project UUID")]
        uuid: String,

        #[arg(help = "Project display name")]
        name: String,

        #[command(flatten)]
        fields: ProjectFields,
    },

    #[command(about = "Delete a project (requires typing its exact name)")]
    Delete {
        #[arg(help = "Project UUID")]
        uuid: String,

        #[arg(long, help = "Exact project name, as a deletion confirmation")]
        confirm: String,
    },
}

pub async fn handle(cmd: ProjectCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let session = Session::establish()?;

    match cmd {
        ProjectCommands::List { team, public } => {
            if public {
                let team = resolve_target_team(team, &session.identity)?;
                let projects = session.client.list_projects_public(&team).await?;
                return print_projects(&output_format, &team, &projects);
            }

            require_read(&session.identity)?;
            let team = resolve_target_team(team, &session.identity)?;

            let mut cache = DirectoryCache::new();
            let projects = cache.ensure(&team, &session.client).await?.to_vec();
            print_projects(&output_format, &team, &projects)
        }
        ProjectCommands::Get { uuid } => {
            let project = session.client.get_project(&uuid).await?;
            output_document(&serde_json::to_value(&project)?)
        }
        ProjectCommands::Create { name, fields } => {
            require_write(&session.identity)?;
            let draft = draft_from_fields(&session, name, fields)?;

            // Admin-scoped creates must target a team from the directory.
            let known_teams = if session.identity.is_admin {
                Some(session.client.list_teams().await?)
            } else {
                None
            };

            let created =
                mutation::create_project(&session.client, &draft, known_teams.as_deref()).await?;
            reconcile(&session, &created.team_name).await;

            output_success(
                &output_format,
                &format!("Project '{}' created", created.projectname),
                Some(json!({ "project": created })),
            )
        }
        ProjectCommands::Update { uuid, name, fields } => {
            require_write(&session.identity)?;
            let draft = draft_from_fields(&session, name, fields)?;

            let known_teams = if session.identity.is_admin {
                Some(session.client.list_teams().await?)
            } else {
                None
            };

            let updated =
                mutation::update_project(&session.client, &uuid, &draft, known_teams.as_deref())
                    .await?;
            reconcile(&session, &updated.team_name).await;

            output_success(
                &output_format,
                &format!("Project '{}' updated", updated.projectname),
                Some(json!({ "project": updated })),
            )
        }
        ProjectCommands::Delete { uuid, confirm } => {
            require_write(&session.identity)?;
            let project = session.client.get_project(&uuid).await?;

            mutation::delete_project(&session.client, &uuid, &confirm, &project.projectname)
                .await?;
            reconcile(&session, &project.team_name).await;

            output_success(
                &output_format,
                &format!("Project '{}' deleted", project.projectname),
                None,
            )
        }
    }
}

fn draft_from_fields(
    session: &Session,
    name: String,
    fields: ProjectFields,
) -> anyhow::Result<ProjectDraft> {
    let team_name = resolve_target_team(fields.team, &session.identity)?;
    Ok(ProjectDraft {
        projectname: name,
        team_name,
        prod_url: fields.prod_url.unwrap_or_default(),
        pre_prod_url: fields.pre_prod_url.unwrap_or_default(),
        pg_url: fields.pg_url.unwrap_or_default(),
    })
}

/// Bring a per-invocation cache back in line with the backend after a
/// mutation. A failed refresh only costs the warm cache, not the mutation.
async fn reconcile(session: &Session, team: &str) {
    let mut cache = DirectoryCache::new();
    match session.client.list_team_projects(team).await {
        Ok(projects) => cache.invalidate(team, projects),
        Err(e) => tracing::warn!(team, "post-mutation refresh failed: {e}"),
    }
}

fn print_projects(
    output_format: &OutputFormat,
    team: &str,
    projects: &[Project],
) -> anyhow::Result<()> {
    if projects.is_empty() {
        return output_empty_collection(
            output_format,
            "projects",
            &format!("No projects registered for team '{}'", team),
        );
    }

    match output_format {
        OutputFormat::Json => {
            output_document(&json!({ "team": team, "projects": projects }))?;
        }
        OutputFormat::Text => {
            println!("{:<38} {:<30} ENVIRONMENTS", "UUID", "NAME");
            println!("{}", "-".repeat(90));
            for project in projects {
                let environments = crate::viewer::resolve_environments(project);
                let envs: Vec<&str> = environments.iter().map(|e| e.label).collect();
                println!(
                    "{:<38} {:<30} {}",
                    project.uuid,
                    project.projectname,
                    if envs.is_empty() { "(none)".to_string() } else { envs.join(", ") }
                );
            }
        }
    }
    Ok(())
}
