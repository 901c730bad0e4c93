//! Team/project directory cache.
//!
//! One authoritative owner for the team -> project-list mapping. Lookups are
//! fetched lazily on first selection and reused until a mutation invalidates
//! the team's entry. Every outgoing fetch is tagged with the team name and a
//! monotonically increasing sequence number so late completions are detected
//! instead of silently clobbering fresher data.

use std::collections::HashMap;

use crate::api::Backend;
use crate::error::Result;
use crate::types::Project;

/// Tag for an in-flight team listing fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub team: String,
    seq: u64,
}

/// What a team selection requires of the caller.
#[derive(Debug, PartialEq, Eq)]
pub enum Selection<'a> {
    /// Entry already cached; served synchronously.
    Cached(&'a [Project]),
    /// No entry yet; perform the fetch and commit the result.
    NeedsFetch(FetchTicket),
}

#[derive(Debug, Default)]
pub struct DirectoryCache {
    entries: HashMap<String, Vec<Project>>,
    active: Option<String>,
    next_seq: u64,
    /// Newest ticket issued per team; older completions are stale.
    latest: HashMap<String, u64>,
}

impl DirectoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a team as the active selection. Returns the cached projects when
    /// present, or a fetch ticket the caller must resolve.
    pub fn select_team(&mut self, team: &str) -> Selection<'_> {
        self.active = Some(team.to_string());
        if self.entries.contains_key(team) {
            return Selection::Cached(&self.entries[team]);
        }
        Selection::NeedsFetch(self.issue_ticket(team))
    }

    /// Currently selected team, if any.
    pub fn active_team(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Cached projects for a team. `None` means never fetched (or invalidated
    /// away); an empty slice is a real, cached "team has no projects".
    pub fn projects(&self, team: &str) -> Option<&[Project]> {
        self.entries.get(team).map(Vec::as_slice)
    }

    /// Commit a completed fetch. The entry is written even when the result is
    /// stale (last write wins, an entry must never disappear); the return
    /// value says whether this result still reflects the latest request for
    /// the team, so callers can skip re-rendering stale data.
    pub fn commit(&mut self, ticket: FetchTicket, mut projects: Vec<Project>) -> bool {
        sort_by_name(&mut projects);
        self.entries.insert(ticket.team.clone(), projects);

        let current = self.latest.get(&ticket.team) == Some(&ticket.seq);
        if !current {
            tracing::debug!(team = %ticket.team, "committed stale project listing");
        }
        current
    }

    /// Replace a team's cached sequence after a mutation.
    pub fn invalidate(&mut self, team: &str, mut updated: Vec<Project>) {
        sort_by_name(&mut updated);
        self.entries.insert(team.to_string(), updated);
    }

    /// Drop a team's entry entirely, forcing a re-fetch on next selection.
    pub fn evict(&mut self, team: &str) {
        self.entries.remove(team);
    }

    /// Select a team and resolve it against the backend in one step. A failed
    /// fetch propagates and leaves the cache unmodified for that team, so a
    /// later retry re-fetches.
    pub async fn ensure(&mut self, team: &str, backend: &impl Backend) -> Result<&[Project]> {
        self.active = Some(team.to_string());
        if !self.entries.contains_key(team) {
            let ticket = self.issue_ticket(team);
            let projects = backend.list_team_projects(team).await?;
            self.commit(ticket, projects);
        }
        Ok(self.entries[team].as_slice())
    }

    fn issue_ticket(&mut self, team: &str) -> FetchTicket {
        self.next_seq += 1;
        self.latest.insert(team.to_string(), self.next_seq);
        FetchTicket { team: team.to_string(), seq: self.next_seq }
    }
}

/// Display-name ordering, case-insensitive ascending.
fn sort_by_name(projects: &mut [Project]) {
    projects.sort_by_key(|p| p.projectname.to_lowercase());
}
