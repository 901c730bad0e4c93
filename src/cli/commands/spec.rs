use clap::Subcommand;
use serde_json::json;

use crate::api::Backend;
use crate::cli::utils::*;
use crate::cli::{OutputFormat, Session};
use crate::viewer::{resolve_environments, EnvKey, SpecState, Viewer};

#[derive(Subcommand)]
pub enum SpecCommands {
    #[command(about = "List the environments a project has configured")]
    Envs {
        #[arg(help = "Project UUID")]
        uuid: String,
    },

    #[command(about = "Fetch and print a project's resolved specification")]
    View {
        #[arg(help = "Project UUID")]
        uuid: String,

        #[arg(long, help = "Environment key (prod_url, pre_prod_url, pg_url)")]
        env: Option<String>,
    },
}

pub async fn handle(cmd: SpecCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let session = Session::establish()?;

    match cmd {
        SpecCommands::Envs { uuid } => {
            let project = session.client.get_project(&uuid).await?;
            let environments = resolve_environments(&project);

            if environments.is_empty() {
                return output_empty_collection(
                    &output_format,
                    "environments",
                    &format!("Project '{}' has no configured environment", project.projectname),
                );
            }

            match output_format {
                OutputFormat::Json => {
                    let envs: Vec<_> = environments
                        .iter()
                        .map(|e| json!({ "key": e.key.as_str(), "label": e.label, "url": e.url }))
                        .collect();
                    output_document(&json!({ "project": project.projectname, "environments": envs }))?;
                }
                OutputFormat::Text => {
                    for env in &environments {
                        println!("{:<16} {}", env.label, env.url);
                    }
                }
            }
            Ok(())
        }
        SpecCommands::View { uuid, env } => {
            let project = session.client.get_project(&uuid).await?;
            let mut viewer = Viewer::new();

            // Default environment first, then honor an explicit switch so an
            // unavailable request surfaces the "no valid environment" signal.
            let mut request = viewer.select_project(project.clone());
            if let Some(raw) = env {
                let key = EnvKey::parse(&raw)
                    .ok_or_else(|| anyhow::anyhow!("unknown environment key '{raw}'"))?;
                request = Some(viewer.switch_env(key)?);
            }

            let Some(request) = request else {
                anyhow::bail!(
                    "project '{}' has no valid environment to display",
                    project.projectname
                );
            };

            viewer.load(&session.client, request).await;
            match viewer.state() {
                SpecState::Loaded { env, spec } => {
                    tracing::debug!(env = env.as_str(), "specification loaded");
                    output_document(spec)
                }
                SpecState::Errored { env, message } => Err(anyhow::anyhow!(
                    "failed to load {} specification: {message}",
                    env.label()
                )),
                // load() always resolves to Loaded or Errored
                other => Err(anyhow::anyhow!("unexpected viewer state: {other:?}")),
            }
        }
    }
}
