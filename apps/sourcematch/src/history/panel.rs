use std::sync::Arc;

use tracing::{info, warn};

use crate::api_client::ApiClient;
use crate::confirm::{ConfirmGate, DeleteOutcome};
use crate::errors::ClientError;
use crate::models::history::SearchHistoryEntry;
use crate::session::loading::{LoadCategory, LoadingFlags};

pub const DELETE_HISTORY_PROMPT: &str =
    "Are you sure you want to delete this search history entry? This cannot be undone.";

/// Candidate-facing history list backed by the API.
pub struct HistoryPanel {
    api: ApiClient,
    gate: Arc<dyn ConfirmGate>,
    loading: LoadingFlags,
    entries: Vec<SearchHistoryEntry>,
}

impl HistoryPanel {
    pub fn new(api: ApiClient, gate: Arc<dyn ConfirmGate>, loading: LoadingFlags) -> Self {
        Self {
            api,
            gate,
            loading,
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[SearchHistoryEntry] {
        &self.entries
    }

    pub fn loading(&self) -> &LoadingFlags {
        &self.loading
    }

    /// Refetches every entry, newest first as served.
    pub async fn refresh(&mut self) -> Result<&[SearchHistoryEntry], ClientError> {
        let _loading = self.loading.begin(LoadCategory::History);
        self.entries = self.api.list_history().await?;
        info!("Loaded {} history entries", self.entries.len());
        Ok(&self.entries)
    }

    /// Deletes one entry after explicit confirmation, then refetches.
    ///
    /// An id the server does not know comes back as a service error.
    pub async fn delete(&mut self, search_id: i64) -> Result<DeleteOutcome, ClientError> {
        if !self.gate.confirm(DELETE_HISTORY_PROMPT).await {
            return Ok(DeleteOutcome::Declined);
        }

        {
            let _loading = self.loading.begin(LoadCategory::History);
            self.api.delete_history(search_id).await?;
        }
        info!("History entry {search_id} deleted");

        self.entries.retain(|e| e.search_id != search_id);
        if let Err(e) = self.refresh().await {
            warn!("Refetch after history delete failed: {e}");
        }
        Ok(DeleteOutcome::Deleted)
    }
}
