use clap::Subcommand;
use serde_json::json;

use crate::api::Backend;
use crate::cli::utils::*;
use crate::cli::{OutputFormat, Session};

#[derive(Subcommand)]
pub enum DashboardCommands {
    #[command(about = "Show registered-project count and recent activity")]
    Show {
        #[arg(short, default_value_t = 5, help = "How many recent activities to show")]
        k: usize,
    },
}

pub async fn handle(cmd: DashboardCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let session = Session::establish()?;

    match cmd {
        DashboardCommands::Show { k } => {
            let stats = session.client.statistics().await?;
            let activities = session.client.recent_activity(k).await?;

            match output_format {
                OutputFormat::Json => {
                    output_document(&json!({
                        "registered_projects": stats.registered_projects,
                        "activities": activities,
                    }))?;
                }
                OutputFormat::Text => {
                    println!("Registered projects: {}", stats.registered_projects);
                    if activities.is_empty() {
                        println!("No recent activity");
                    } else {
                        println!("Recent activity:");
                        for activity in &activities {
                            println!(
                                "  {}  {}",
                                activity.time.format("%Y-%m-%d %H:%M"),
                                activity.message
                            );
                        }
                    }
                }
            }
            Ok(())
        }
    }
}
