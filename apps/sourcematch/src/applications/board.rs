//! Recruiter view over job applications: list, detail, status changes, deletion.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{info, warn};

use crate::api_client::ApiClient;
use crate::applications::stats::ApplicationStats;
use crate::confirm::{ConfirmGate, DeleteOutcome};
use crate::errors::ClientError;
use crate::models::application::{Application, ApplicationStatus, StatusAck};
use crate::session::loading::{LoadCategory, LoadingFlags};

pub const DELETE_APPLICATION_PROMPT: &str =
    "Are you sure you want to delete this application? This cannot be undone.";

/// Status filter applied to the application list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ApplicationStatus),
}

impl StatusFilter {
    pub fn status(self) -> Option<ApplicationStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Only(status) => Some(status),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => status.fmt(f),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse().map(StatusFilter::Only)
    }
}

pub struct ApplicationBoard {
    api: ApiClient,
    gate: Arc<dyn ConfirmGate>,
    loading: LoadingFlags,
    filter: StatusFilter,
    applications: Vec<Application>,
    selected: Option<Application>,
}

impl ApplicationBoard {
    pub fn new(api: ApiClient, gate: Arc<dyn ConfirmGate>, loading: LoadingFlags) -> Self {
        Self {
            api,
            gate,
            loading,
            filter: StatusFilter::All,
            applications: Vec::new(),
            selected: None,
        }
    }

    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    /// The application open in the detail view, if any.
    pub fn selected(&self) -> Option<&Application> {
        self.selected.as_ref()
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub fn loading(&self) -> &LoadingFlags {
        &self.loading
    }

    pub fn stats(&self) -> ApplicationStats {
        ApplicationStats::from_applications(&self.applications)
    }

    /// Refetches the whole list for the current filter.
    pub async fn refresh(&mut self) -> Result<&[Application], ClientError> {
        let _loading = self.loading.begin(LoadCategory::Applications);
        let applications = self.api.list_applications(self.filter.status()).await?;
        info!(
            "Loaded {} applications (filter: {})",
            applications.len(),
            self.filter
        );
        self.applications = applications;
        Ok(&self.applications)
    }

    pub async fn set_filter(&mut self, filter: StatusFilter) -> Result<&[Application], ClientError> {
        self.filter = filter;
        self.refresh().await
    }

    /// Loads the detailed record into the detail view.
    pub async fn open(&mut self, application_id: i64) -> Result<&Application, ClientError> {
        let _loading = self.loading.begin(LoadCategory::Applications);
        let detail = self.api.get_application(application_id).await?;
        Ok(self.selected.insert(detail))
    }

    pub fn close(&mut self) {
        self.selected = None;
    }

    /// Moves an application to `to`.
    ///
    /// The transition is validated against the last known status before any
    /// request. On success the detail view is closed and the list refetched;
    /// on failure local state is untouched.
    pub async fn transition(
        &mut self,
        application_id: i64,
        to: ApplicationStatus,
    ) -> Result<StatusAck, ClientError> {
        let current = match self.known_status(application_id) {
            Some(status) => status,
            None => self.api.get_application(application_id).await?.status,
        };
        current.transition(to)?;

        let ack = {
            let _loading = self.loading.begin(LoadCategory::Applications);
            self.api
                .update_application_status(application_id, to)
                .await?
        };
        info!("Application {application_id}: {current} -> {}", ack.new_status);

        self.selected = None;
        self.refresh_after_mutation().await;
        Ok(ack)
    }

    /// Deletes an application after explicit confirmation.
    ///
    /// A successful delete closes whatever detail view is open.
    pub async fn delete(&mut self, application_id: i64) -> Result<DeleteOutcome, ClientError> {
        if !self.gate.confirm(DELETE_APPLICATION_PROMPT).await {
            return Ok(DeleteOutcome::Declined);
        }

        {
            let _loading = self.loading.begin(LoadCategory::Applications);
            self.api.delete_application(application_id).await?;
        }
        info!("Application {application_id} deleted");

        self.applications
            .retain(|a| a.application_id != application_id);
        self.selected = None;
        self.refresh_after_mutation().await;
        Ok(DeleteOutcome::Deleted)
    }

    fn known_status(&self, application_id: i64) -> Option<ApplicationStatus> {
        self.selected
            .iter()
            .chain(self.applications.iter())
            .find(|a| a.application_id == application_id)
            .map(|a| a.status)
    }

    /// The mutation already succeeded; a failed refetch only leaves the list stale.
    async fn refresh_after_mutation(&mut self) {
        if let Err(e) = self.refresh().await {
            warn!("Refetch after mutation failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_parse() {
        assert_eq!("all".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!(
            "rejected".parse::<StatusFilter>(),
            Ok(StatusFilter::Only(ApplicationStatus::Rejected))
        );
        assert!("pending".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn test_filter_maps_to_query() {
        assert_eq!(StatusFilter::All.status(), None);
        assert_eq!(
            StatusFilter::Only(ApplicationStatus::Shortlisted).status(),
            Some(ApplicationStatus::Shortlisted)
        );
        assert_eq!(StatusFilter::Only(ApplicationStatus::Applied).to_string(), "applied");
    }
}
