use clap::Subcommand;
use serde_json::json;

use crate::cli::config::{clear_token, save_token};
use crate::cli::utils::*;
use crate::cli::{OutputFormat, Session};
use crate::identity::resolve_identity;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Store a bearer token for subsequent commands")]
    Login {
        #[arg(help = "Bearer token issued by the FlipDocs backend")]
        token: String,
    },

    #[command(about = "Forget the stored token")]
    Logout,

    #[command(about = "Show the identity derived from the stored token")]
    Whoami,
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { token } => {
            // Decode before storing so a broken token is rejected up front.
            let identity = resolve_identity(&token)?;
            save_token(&token)?;

            output_success(
                &output_format,
                "Token stored",
                Some(json!({
                    "effective_team": identity.effective_team,
                    "is_admin": identity.is_admin,
                })),
            )
        }
        AuthCommands::Logout => {
            if clear_token()? {
                output_success(&output_format, "Token removed", None)
            } else {
                output_success(&output_format, "No token was stored", None)
            }
        }
        AuthCommands::Whoami => {
            let session = Session::establish()?;
            let identity = &session.identity;

            match output_format {
                OutputFormat::Json => {
                    let grants: serde_json::Map<String, serde_json::Value> = identity
                        .grants
                        .iter()
                        .map(|(team, g)| {
                            (
                                team.clone(),
                                json!({ "admin": g.admin, "read": g.read, "write": g.write }),
                            )
                        })
                        .collect();
                    output_document(&json!({
                        "effective_team": identity.effective_team,
                        "is_admin": identity.is_admin,
                        "can_read": identity.can_read,
                        "can_write": identity.can_write,
                        "grants": grants,
                    }))?;
                }
                OutputFormat::Text => {
                    match &identity.effective_team {
                        Some(team) => println!("Effective team: {}", team),
                        None => println!("Unauthenticated (no usable grants)"),
                    }
                    println!(
                        "admin: {}  read: {}  write: {}",
                        identity.is_admin, identity.can_read, identity.can_write
                    );
                    for (team, g) in &identity.grants {
                        println!(
                            "  {:<20} admin={} read={} write={}",
                            team, g.admin, g.read, g.write
                        );
                    }
                }
            }
            Ok(())
        }
    }
}
