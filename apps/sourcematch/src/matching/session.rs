//! One scoring cycle: pick a resume, score it against every job, apply.

use tracing::info;

use crate::api_client::ApiClient;
use crate::errors::ClientError;
use crate::matching::resume::ResumeArtifact;
use crate::models::application::ApplyAck;
use crate::models::history::MatchResult;
use crate::session::loading::{LoadCategory, LoadingFlags};

/// Number of ranked matches presented after scoring.
pub const TOP_MATCHES: usize = 5;

/// A match as presented: server rank, normalized percentage, raw result.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMatch {
    /// 1-based position in the scoring engine's ranking.
    pub rank: usize,
    pub percent: u8,
    pub result: MatchResult,
}

pub struct MatchingSession {
    api: ApiClient,
    loading: LoadingFlags,
    resume: Option<ResumeArtifact>,
    matches: Vec<ScoredMatch>,
}

impl MatchingSession {
    pub fn new(api: ApiClient, loading: LoadingFlags) -> Self {
        Self {
            api,
            loading,
            resume: None,
            matches: Vec::new(),
        }
    }

    pub fn select_resume(&mut self, resume: ResumeArtifact) {
        info!("Selected resume {} ({} bytes)", resume.file_name(), resume.len());
        self.resume = Some(resume);
    }

    pub fn clear_resume(&mut self) {
        self.resume = None;
    }

    pub fn resume(&self) -> Option<&ResumeArtifact> {
        self.resume.as_ref()
    }

    /// Matches from the last successful [`score`](Self::score) call.
    pub fn matches(&self) -> &[ScoredMatch] {
        &self.matches
    }

    pub fn loading(&self) -> &LoadingFlags {
        &self.loading
    }

    /// Scores the selected resume and keeps the top [`TOP_MATCHES`] in server order.
    ///
    /// Without a selected resume nothing is sent.
    pub async fn score(&mut self) -> Result<&[ScoredMatch], ClientError> {
        let resume = self
            .resume
            .as_ref()
            .ok_or_else(|| ClientError::Validation("Please select a resume file".to_string()))?;

        let results = {
            let _loading = self.loading.begin(LoadCategory::Scoring);
            self.api.score_resume(resume).await?
        };
        info!("Scored {} against {} jobs", resume.file_name(), results.len());

        self.matches = rank_matches(results);
        Ok(&self.matches)
    }

    /// Applies `candidate_id` to `job_id`, sending the selected resume or a
    /// placeholder when none was uploaded in this session.
    pub async fn apply(&self, job_id: i64, candidate_id: i64) -> Result<ApplyAck, ClientError> {
        let placeholder;
        let resume = match &self.resume {
            Some(resume) => resume,
            None => {
                placeholder = ResumeArtifact::placeholder();
                &placeholder
            }
        };

        let ack = {
            let _loading = self.loading.begin(LoadCategory::Applications);
            self.api.apply(job_id, candidate_id, resume).await?
        };
        info!(
            "Candidate {candidate_id} applied to job {job_id} (application {})",
            ack.application_id
        );
        Ok(ack)
    }

    /// [`apply`](Self::apply) as the logged-in user.
    pub async fn apply_as_current_user(&self, job_id: i64) -> Result<ApplyAck, ClientError> {
        let user = self
            .api
            .session()
            .current_user()
            .ok_or_else(|| ClientError::Validation("Please log in to apply".to_string()))?;
        self.apply(job_id, user.id).await
    }
}

fn rank_matches(results: Vec<MatchResult>) -> Vec<ScoredMatch> {
    results
        .into_iter()
        .take(TOP_MATCHES)
        .enumerate()
        .map(|(i, result)| ScoredMatch {
            rank: i + 1,
            percent: result.percent(),
            result,
        })
        .collect()
}
