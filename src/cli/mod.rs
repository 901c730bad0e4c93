pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::api::ApiClient;
use crate::identity::{resolve_identity, Identity};

#[derive(Parser)]
#[command(name = "flipdocs")]
#[command(about = "FlipDocs CLI - browse and manage Swagger/OpenAPI documentation projects")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Authentication and token management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Team directory management")]
    Team {
        #[command(subcommand)]
        cmd: commands::team::TeamCommands,
    },

    #[command(about = "Project registry operations")]
    Project {
        #[command(subcommand)]
        cmd: commands::project::ProjectCommands,
    },

    #[command(about = "Resolve and fetch Swagger/OpenAPI specifications")]
    Spec {
        #[command(subcommand)]
        cmd: commands::spec::SpecCommands,
    },

    #[command(about = "Registered-project counts and recent activity")]
    Dashboard {
        #[command(subcommand)]
        cmd: commands::dashboard::DashboardCommands,
    },

    #[command(about = "Bulk project import from CSV")]
    Upload {
        #[command(subcommand)]
        cmd: commands::upload::UploadCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Per-invocation session: the stored token read once, the identity derived
/// from it once, and a client carrying the bearer token.
pub struct Session {
    pub client: ApiClient,
    pub identity: Identity,
}

impl Session {
    pub fn establish() -> anyhow::Result<Self> {
        let token = config::load_token()?;

        // A token that fails to decode is treated as "unauthenticated", never
        // as a hard error; public commands still work.
        let identity = match token.as_deref() {
            Some(raw) => resolve_identity(raw).unwrap_or_else(|e| {
                tracing::warn!("stored token could not be decoded: {e}");
                Identity::unauthenticated()
            }),
            None => Identity::unauthenticated(),
        };

        let client = ApiClient::from_config(token)?;
        Ok(Self { client, identity })
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, output_format).await,
        Commands::Team { cmd } => commands::team::handle(cmd, output_format).await,
        Commands::Project { cmd } => commands::project::handle(cmd, output_format).await,
        Commands::Spec { cmd } => commands::spec::handle(cmd, output_format).await,
        Commands::Dashboard { cmd } => commands::dashboard::handle(cmd, output_format).await,
        Commands::Upload { cmd } => commands::upload::handle(cmd, output_format).await,
    }
}
