use clap::Subcommand;
use serde_json::json;

use crate::api::Backend;
use crate::cli::utils::*;
use crate::cli::{OutputFormat, Session};
use crate::mutation;

#[derive(Subcommand)]
pub enum TeamCommands {
    #[command(about = "List all teams in the directory")]
    List,

    #[command(about = "Create a new team (admin only)")]
    Create {
        #[arg(help = "Team name")]
        name: String,
    },
}

pub async fn handle(cmd: TeamCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let session = Session::establish()?;

    match cmd {
        TeamCommands::List => {
            require_read(&session.identity)?;
            let teams = session.client.list_teams().await?;

            if teams.is_empty() {
                return output_empty_collection(&output_format, "teams", "No teams registered");
            }

            match output_format {
                OutputFormat::Json => {
                    output_document(&json!({ "teams": teams }))?;
                }
                OutputFormat::Text => {
                    for team in &teams {
                        println!("{}", team.team_name);
                    }
                }
            }
            Ok(())
        }
        TeamCommands::Create { name } => {
            require_admin(&session.identity)?;
            let team = mutation::create_team(&session.client, &name).await?;
            output_success(
                &output_format,
                &format!("Team '{}' created", team.team_name),
                Some(json!({ "team": team })),
            )
        }
    }
}
