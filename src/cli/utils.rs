use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::identity::Identity;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(Value::Object(extra)) = data {
                response.as_object_mut().unwrap().extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(
    output_format: &OutputFormat,
    collection_name: &str,
    message: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                collection_name: []
            }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// Pretty-print an arbitrary JSON document regardless of output mode.
pub fn output_document(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Gate for read-scoped commands.
pub fn require_read(identity: &Identity) -> anyhow::Result<()> {
    if identity.is_admin || identity.can_read {
        return Ok(());
    }
    Err(anyhow::anyhow!("read permission required; run 'flipdocs auth login' first"))
}

/// Gate for write-scoped commands.
pub fn require_write(identity: &Identity) -> anyhow::Result<()> {
    if identity.is_admin || identity.can_write {
        return Ok(());
    }
    Err(anyhow::anyhow!("write permission required for this operation"))
}

/// Gate for admin-only commands.
pub fn require_admin(identity: &Identity) -> anyhow::Result<()> {
    if identity.is_admin {
        return Ok(());
    }
    Err(anyhow::anyhow!("admin permission required for this operation"))
}

/// The team a command targets: explicit argument if given, else the
/// identity's effective team.
pub fn resolve_target_team(provided: Option<String>, identity: &Identity) -> anyhow::Result<String> {
    match provided {
        Some(team) => Ok(team),
        None => identity
            .effective_team
            .clone()
            .ok_or_else(|| anyhow::anyhow!("no team given and no effective team on the session")),
    }
}
