//! Search history: one scoring request and its ranked results per entry.
//!
//! [`SearchHistoryStore`] is the persistence contract; [`InMemoryHistoryStore`]
//! implements it locally. [`HistoryPanel`] consumes the same contract over the API.

pub mod panel;

use std::sync::Mutex;

use chrono::Utc;
use thiserror::Error;
use tracing::debug;

use crate::models::history::{MatchResult, SearchHistoryEntry};

pub use panel::HistoryPanel;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("Match search {0} not found")]
    NotFound(i64),

    #[error("history store unavailable")]
    Unavailable,
}

pub trait SearchHistoryStore: Send + Sync {
    /// Stores one search with all of its results, or nothing at all.
    fn record_search(
        &self,
        candidate_id: Option<i64>,
        resume_ref: &str,
        results: Vec<MatchResult>,
    ) -> Result<SearchHistoryEntry, HistoryError>;

    /// Entries newest first. `None` lists every candidate's searches.
    fn list_history(&self, candidate_id: Option<i64>) -> Result<Vec<SearchHistoryEntry>, HistoryError>;

    /// Removes exactly one entry. Unknown ids are an error.
    fn delete_history(&self, search_id: i64) -> Result<SearchHistoryEntry, HistoryError>;
}

#[derive(Debug, Default)]
struct HistoryState {
    next_id: i64,
    entries: Vec<SearchHistoryEntry>,
}

#[derive(Debug, Default)]
pub struct InMemoryHistoryStore {
    state: Mutex<HistoryState>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SearchHistoryStore for InMemoryHistoryStore {
    fn record_search(
        &self,
        candidate_id: Option<i64>,
        resume_ref: &str,
        results: Vec<MatchResult>,
    ) -> Result<SearchHistoryEntry, HistoryError> {
        let mut state = self.state.lock().map_err(|_| HistoryError::Unavailable)?;
        state.next_id += 1;
        let entry = SearchHistoryEntry {
            search_id: state.next_id,
            candidate_id,
            resume_path: Some(resume_ref.to_string()),
            created_at: Utc::now().naive_utc(),
            results,
        };
        state.entries.push(entry.clone());
        debug!(
            "Recorded search {} with {} results",
            entry.search_id,
            entry.results.len()
        );
        Ok(entry)
    }

    fn list_history(&self, candidate_id: Option<i64>) -> Result<Vec<SearchHistoryEntry>, HistoryError> {
        let state = self.state.lock().map_err(|_| HistoryError::Unavailable)?;
        let mut entries: Vec<SearchHistoryEntry> = state
            .entries
            .iter()
            .filter(|e| candidate_id.is_none() || e.candidate_id == candidate_id)
            .cloned()
            .collect();
        // Ids are assigned in insertion order, so they break timestamp ties.
        entries.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.search_id.cmp(&a.search_id))
        });
        Ok(entries)
    }

    fn delete_history(&self, search_id: i64) -> Result<SearchHistoryEntry, HistoryError> {
        let mut state = self.state.lock().map_err(|_| HistoryError::Unavailable)?;
        let idx = state
            .entries
            .iter()
            .position(|e| e.search_id == search_id)
            .ok_or(HistoryError::NotFound(search_id))?;
        Ok(state.entries.remove(idx))
    }
}
