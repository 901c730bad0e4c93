use std::path::PathBuf;

use clap::Subcommand;
use serde_json::json;

use crate::api::Backend;
use crate::cli::utils::*;
use crate::cli::{OutputFormat, Session};

#[derive(Subcommand)]
pub enum UploadCommands {
    #[command(about = "Bulk-import projects from a CSV file")]
    Csv {
        #[arg(help = "Path to the CSV file (projectname, team_name, URL columns)")]
        path: PathBuf,
    },
}

pub async fn handle(cmd: UploadCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let session = Session::establish()?;

    match cmd {
        UploadCommands::Csv { path } => {
            require_write(&session.identity)?;

            let filename = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("projects.csv")
                .to_string();
            let content = tokio::fs::read(&path)
                .await
                .map_err(|e| anyhow::anyhow!("could not read {}: {e}", path.display()))?;

            let outcome = session.client.upload_csv(&filename, content).await?;
            output_success(
                &output_format,
                &outcome.message,
                Some(json!({ "file": filename })),
            )
        }
    }
}
