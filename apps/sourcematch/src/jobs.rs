use std::sync::Arc;

use tracing::{info, warn};

use crate::api_client::ApiClient;
use crate::auth::require_privileged;
use crate::confirm::{ConfirmGate, DeleteOutcome};
use crate::errors::ClientError;
use crate::models::job::{Job, NewJob};
use crate::session::loading::{LoadCategory, LoadingFlags};

pub const DELETE_JOB_PROMPT: &str = "Are you sure you want to delete this job? This cannot be undone.";

/// Job listings, readable by everyone and managed by recruiters.
pub struct JobBoard {
    api: ApiClient,
    gate: Arc<dyn ConfirmGate>,
    loading: LoadingFlags,
    jobs: Vec<Job>,
}

impl JobBoard {
    pub fn new(api: ApiClient, gate: Arc<dyn ConfirmGate>, loading: LoadingFlags) -> Self {
        Self {
            api,
            gate,
            loading,
            jobs: Vec::new(),
        }
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn find(&self, job_id: i64) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == job_id)
    }

    pub async fn refresh(&mut self) -> Result<&[Job], ClientError> {
        let _loading = self.loading.begin(LoadCategory::Jobs);
        self.jobs = self.api.list_jobs().await?;
        info!("Loaded {} jobs", self.jobs.len());
        Ok(&self.jobs)
    }

    pub async fn post(&mut self, job: &NewJob) -> Result<Job, ClientError> {
        job.validate().map_err(ClientError::Validation)?;
        require_privileged(&self.api, "post jobs")?;

        let created = {
            let _loading = self.loading.begin(LoadCategory::Jobs);
            self.api.create_job(job).await?
        };
        info!("Posted job {} ({})", created.id, created.title);

        if let Err(e) = self.refresh().await {
            warn!("Refetch after posting job failed: {e}");
        }
        Ok(created)
    }

    pub async fn delete(&mut self, job_id: i64) -> Result<DeleteOutcome, ClientError> {
        require_privileged(&self.api, "delete jobs")?;
        if !self.gate.confirm(DELETE_JOB_PROMPT).await {
            return Ok(DeleteOutcome::Declined);
        }

        {
            let _loading = self.loading.begin(LoadCategory::Jobs);
            self.api.delete_job(job_id).await?;
        }
        info!("Job {job_id} deleted");

        self.jobs.retain(|j| j.id != job_id);
        if let Err(e) = self.refresh().await {
            warn!("Refetch after deleting job failed: {e}");
        }
        Ok(DeleteOutcome::Deleted)
    }
}
