//! API client: the single point of entry for every backend call.
//!
//! Every request goes through [`ApiClient::send`], which attaches the bearer
//! token and applies the response policy: 401/403 tears the session down,
//! other failures are mapped onto [`ClientError`]. No request is retried.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::ClientError;
use crate::matching::resume::ResumeArtifact;
use crate::models::application::{Application, ApplicationStatus, ApplyAck, StatusAck};
use crate::models::history::{MatchResult, SearchHistoryEntry};
use crate::models::job::{Job, NewJob};
use crate::models::settings::SkillThreshold;
use crate::models::user::{LoginRequest, LoginResponse, RegisterRequest, User};
use crate::session::SessionContext;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Value>,
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<SessionContext>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        session: Arc<SessionContext>,
    ) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Sends `request` with the current bearer token and returns the raw body
    /// of a successful response.
    async fn send(&self, request: RequestBuilder) -> Result<Bytes, ClientError> {
        let token = self.session.token();
        let request = match &token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.bytes().await?;

        if status.is_success() {
            debug!("{} {} ({} bytes)", status.as_u16(), url, body.len());
            return Ok(body);
        }

        let detail = extract_detail(&body);
        warn!(
            "API returned {} for {}: {}",
            status,
            url,
            detail.as_deref().unwrap_or("<no detail>")
        );

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            if let Some(token) = &token {
                self.session.force_logout(token);
            }
            return Err(ClientError::Unauthorized {
                status: status.as_u16(),
                detail,
            });
        }

        Err(ClientError::Service {
            status: status.as_u16(),
            detail,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let body = self.send(request).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// A `null` or empty body decodes as an empty list.
    async fn send_list<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Vec<T>, ClientError> {
        let body = self.send(request).await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        let items: Option<Vec<T>> = serde_json::from_slice(&body)?;
        Ok(items.unwrap_or_default())
    }

    // ────────────────────────────────────────────────────────────────────────
    // Users
    // ────────────────────────────────────────────────────────────────────────

    /// POST /users/register
    pub async fn register(&self, req: &RegisterRequest) -> Result<User, ClientError> {
        self.send_json(self.client.post(self.url("users/register")).json(req))
            .await
    }

    /// POST /users/login
    pub async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, ClientError> {
        self.send_json(self.client.post(self.url("users/login")).json(req))
            .await
    }

    /// GET /users/recruiter/users
    pub async fn list_users(&self) -> Result<Vec<User>, ClientError> {
        self.send_list(self.client.get(self.url("users/recruiter/users")))
            .await
    }

    /// DELETE /users/recruiter/users/{id}
    pub async fn delete_user(&self, user_id: i64) -> Result<(), ClientError> {
        self.send(
            self.client
                .delete(self.url(&format!("users/recruiter/users/{user_id}"))),
        )
        .await?;
        Ok(())
    }

    // ────────────────────────────────────────────────────────────────────────
    // Jobs
    // ────────────────────────────────────────────────────────────────────────

    /// GET /jobs
    pub async fn list_jobs(&self) -> Result<Vec<Job>, ClientError> {
        self.send_list(self.client.get(self.url("jobs"))).await
    }

    /// POST /jobs
    pub async fn create_job(&self, job: &NewJob) -> Result<Job, ClientError> {
        self.send_json(self.client.post(self.url("jobs")).json(job))
            .await
    }

    /// DELETE /jobs/{id}
    pub async fn delete_job(&self, job_id: i64) -> Result<(), ClientError> {
        self.send(self.client.delete(self.url(&format!("jobs/{job_id}"))))
            .await?;
        Ok(())
    }

    // ────────────────────────────────────────────────────────────────────────
    // Scoring & applying
    // ────────────────────────────────────────────────────────────────────────

    /// POST /applications/score (multipart field `resume`)
    pub async fn score_resume(&self, resume: &ResumeArtifact) -> Result<Vec<MatchResult>, ClientError> {
        let form = Form::new().part("resume", resume_part(resume)?);
        self.send_list(
            self.client
                .post(self.url("applications/score"))
                .multipart(form),
        )
        .await
    }

    /// POST /applications/apply (multipart fields `job_id`, `candidate_id`, `resume`)
    pub async fn apply(
        &self,
        job_id: i64,
        candidate_id: i64,
        resume: &ResumeArtifact,
    ) -> Result<ApplyAck, ClientError> {
        let form = Form::new()
            .text("job_id", job_id.to_string())
            .text("candidate_id", candidate_id.to_string())
            .part("resume", resume_part(resume)?);
        self.send_json(
            self.client
                .post(self.url("applications/apply"))
                .multipart(form),
        )
        .await
    }

    // ────────────────────────────────────────────────────────────────────────
    // Search history
    // ────────────────────────────────────────────────────────────────────────

    /// GET /applications/history
    pub async fn list_history(&self) -> Result<Vec<SearchHistoryEntry>, ClientError> {
        self.send_list(self.client.get(self.url("applications/history")))
            .await
    }

    /// DELETE /applications/history/{search_id}
    pub async fn delete_history(&self, search_id: i64) -> Result<(), ClientError> {
        self.send(
            self.client
                .delete(self.url(&format!("applications/history/{search_id}"))),
        )
        .await?;
        Ok(())
    }

    // ────────────────────────────────────────────────────────────────────────
    // Recruiter applications
    // ────────────────────────────────────────────────────────────────────────

    /// GET /applications/recruiter/applications?status=
    pub async fn list_applications(
        &self,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<Application>, ClientError> {
        let mut request = self
            .client
            .get(self.url("applications/recruiter/applications"));
        if let Some(status) = status {
            request = request.query(&[("status", status.label())]);
        }
        self.send_list(request).await
    }

    /// GET /applications/recruiter/applications/{id}
    pub async fn get_application(&self, application_id: i64) -> Result<Application, ClientError> {
        self.send_json(self.client.get(self.url(&format!(
            "applications/recruiter/applications/{application_id}"
        ))))
        .await
    }

    /// PUT /applications/recruiter/applications/{id}/status (multipart field `status`)
    pub async fn update_application_status(
        &self,
        application_id: i64,
        status: ApplicationStatus,
    ) -> Result<StatusAck, ClientError> {
        let form = Form::new().text("status", status.label());
        self.send_json(
            self.client
                .put(self.url(&format!(
                    "applications/recruiter/applications/{application_id}/status"
                )))
                .multipart(form),
        )
        .await
    }

    /// DELETE /applications/recruiter/applications/{id}
    pub async fn delete_application(&self, application_id: i64) -> Result<(), ClientError> {
        self.send(self.client.delete(self.url(&format!(
            "applications/recruiter/applications/{application_id}"
        ))))
        .await?;
        Ok(())
    }

    // ────────────────────────────────────────────────────────────────────────
    // Settings
    // ────────────────────────────────────────────────────────────────────────

    /// GET /settings/skill_threshold
    pub async fn get_skill_threshold(&self) -> Result<SkillThreshold, ClientError> {
        self.send_json(self.client.get(self.url("settings/skill_threshold")))
            .await
    }

    /// PUT /settings/skill_threshold
    pub async fn set_skill_threshold(
        &self,
        threshold: SkillThreshold,
    ) -> Result<SkillThreshold, ClientError> {
        self.send_json(
            self.client
                .put(self.url("settings/skill_threshold"))
                .json(&threshold),
        )
        .await
    }
}

fn resume_part(resume: &ResumeArtifact) -> Result<Part, ClientError> {
    Ok(Part::bytes(resume.content().to_vec())
        .file_name(resume.file_name().to_string())
        .mime_str(resume.content_type())?)
}

/// Pulls the `detail` field out of an error body.
///
/// String details are returned as is; structured details (validation error
/// lists) are rendered as compact JSON.
fn extract_detail(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    match parsed.detail? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}
