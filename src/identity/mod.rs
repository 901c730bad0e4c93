//! Token permission resolver.
//!
//! Decodes the bearer token's payload and derives the user's effective team
//! and capability flags from the per-team role-grant claims. No signature
//! verification happens client-side; the backend has already verified the
//! token, and these claims only gate what the client offers to do.

use std::collections::BTreeMap;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde_json::Value;

use crate::config;
use crate::error::{Error, Result};

/// Role grants for one team, parsed from `<namespace>.<team>.<role>` claims.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamGrants {
    pub admin: bool,
    pub read: bool,
    pub write: bool,
}

impl TeamGrants {
    pub fn any(&self) -> bool {
        self.admin || self.read || self.write
    }
}

/// Session identity derived once from the stored token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub effective_team: Option<String>,
    pub is_admin: bool,
    pub can_read: bool,
    pub can_write: bool,
    /// Full grant map, team name -> grants. Multi-team tokens carry more
    /// entries than the single effective team exposes.
    pub grants: BTreeMap<String, TeamGrants>,
}

impl Identity {
    /// Identity of a caller with no usable token.
    pub fn unauthenticated() -> Self {
        Self {
            effective_team: None,
            is_admin: false,
            can_read: false,
            can_write: false,
            grants: BTreeMap::new(),
        }
    }
}

/// Decode the token payload and derive the effective identity.
///
/// The effective team is the first team, in sorted name order, with at least
/// one truthy grant. Tokens granting several teams are deliberately collapsed
/// to one; the full map stays available in `Identity::grants`.
pub fn resolve_identity(raw_token: &str) -> Result<Identity> {
    let payload = decode_payload(raw_token)?;
    let grants = collect_grants(&payload, &config::config().auth.claim_namespace);

    let effective = grants
        .iter()
        .find(|(_, g)| g.any())
        .map(|(team, g)| (team.clone(), *g));

    Ok(match effective {
        Some((team, g)) => Identity {
            effective_team: Some(team),
            is_admin: g.admin,
            can_read: g.read,
            can_write: g.write,
            grants,
        },
        None => Identity { grants, ..Identity::unauthenticated() },
    })
}

/// Base64url-decode the middle JWT segment into a JSON object.
fn decode_payload(raw_token: &str) -> Result<serde_json::Map<String, Value>> {
    let mut segments = raw_token.split('.');
    let payload = match (segments.next(), segments.next()) {
        (Some(_header), Some(payload)) if !payload.is_empty() => payload,
        _ => return Err(Error::Decode("token is not a structured token".into())),
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| Error::Decode(format!("payload is not base64url: {e}")))?;

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(Error::Decode("payload is not a JSON object".into())),
        Err(e) => Err(Error::Decode(format!("payload is not JSON: {e}"))),
    }
}

/// Group `<namespace>.<team>.<role>` claims into per-team grants.
/// Claims outside the namespace, with unknown roles, or with non-boolean
/// values are ignored.
fn collect_grants(payload: &serde_json::Map<String, Value>, namespace: &str) -> BTreeMap<String, TeamGrants> {
    let prefix = format!("{namespace}.");
    let mut grants: BTreeMap<String, TeamGrants> = BTreeMap::new();

    for (key, value) in payload {
        let Some(rest) = key.strip_prefix(&prefix) else { continue };
        let Some((team, role)) = rest.rsplit_once('.') else { continue };
        if team.is_empty() {
            continue;
        }
        let truthy = value.as_bool().unwrap_or(false);
        let entry = grants.entry(team.to_string()).or_default();
        match role {
            "admin" => entry.admin = truthy || entry.admin,
            "read" => entry.read = truthy || entry.read,
            "write" => entry.write = truthy || entry.write,
            _ => {}
        }
    }

    grants
}
