//! In-process mock of the matching backend, served on an ephemeral port.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, Path, Query, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use sourcematch::config::Config;
use sourcematch::confirm::ConfirmGate;
use sourcematch::history::{HistoryError, InMemoryHistoryStore, SearchHistoryStore};
use sourcematch::models::application::{Application, ApplicationStatus};
use sourcematch::models::history::{Explanation, MatchResult};
use sourcematch::models::job::Job;
use sourcematch::models::settings::SkillThreshold;
use sourcematch::models::user::{Role, User};
use sourcematch::session::store::MemorySessionStore;
use sourcematch::{AppState, ScoreValue};

pub const PASSWORD: &str = "secret123";
pub const CANDIDATE_EMAIL: &str = "asha@example.com";
pub const RECRUITER_EMAIL: &str = "recruiter@example.com";

#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Default)]
pub struct Backend {
    pub history: InMemoryHistoryStore,
    pub applications: Mutex<Vec<Application>>,
    pub jobs: Mutex<Vec<Job>>,
    pub users: Mutex<Vec<User>>,
    /// Served as-is by the scoring endpoint.
    pub score_results: Mutex<Vec<MatchResult>>,
    pub threshold: Mutex<SkillThreshold>,
    /// Holds every apply request for a short while before answering.
    pub slow_apply: AtomicBool,
    tokens: Mutex<Vec<(String, User)>>,
    requests: Mutex<Vec<String>>,
    uploads: Mutex<Vec<Upload>>,
}

impl Backend {
    /// Every request seen, as `"METHOD /path?query"`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("requests lock").len()
    }

    pub fn uploads(&self) -> Vec<Upload> {
        self.uploads.lock().expect("uploads lock").clone()
    }

    /// Expires every issued token.
    pub fn revoke_tokens(&self) {
        self.tokens.lock().expect("tokens lock").clear();
    }

    pub fn application_status(&self, application_id: i64) -> Option<ApplicationStatus> {
        self.applications
            .lock()
            .expect("applications lock")
            .iter()
            .find(|a| a.application_id == application_id)
            .map(|a| a.status)
    }

    fn user_for(&self, token: &str) -> Option<User> {
        self.tokens
            .lock()
            .expect("tokens lock")
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, u)| u.clone())
    }

    fn issue_token(&self, user: User) -> String {
        let mut tokens = self.tokens.lock().expect("tokens lock");
        let token = format!("token-{}-{}", user.id, tokens.len() + 1);
        tokens.push((token.clone(), user));
        token
    }
}

pub fn job(id: i64, title: &str, skills: &str) -> Job {
    Job {
        id,
        title: title.to_string(),
        description: format!("{title} role"),
        company: Some("Acme".to_string()),
        location: None,
        salary_min: None,
        salary_max: None,
        experience_level: "Mid-level".to_string(),
        required_skills: Some(skills.to_string()),
        requirements: Value::Null,
    }
}

pub fn match_result(job_id: i64, score: f64) -> MatchResult {
    MatchResult {
        job_id,
        job_title: format!("Job {job_id}"),
        job_description: None,
        score: ScoreValue(score),
        matched_skills: vec!["sql".to_string()],
        explanation: Some(Explanation {
            summary: Some(format!("fit for job {job_id}")),
            matched_skills: vec!["sql".to_string()],
            ..Explanation::default()
        }),
    }
}

pub fn application(application_id: i64, status: ApplicationStatus, score: f64) -> Application {
    Application {
        application_id,
        job_id: 1,
        candidate_id: 11,
        score: ScoreValue(score),
        status,
        created_at: timestamp(),
        job_title: "Data Analyst".to_string(),
        candidate_name: format!("Candidate {application_id}"),
        candidate_email: format!("c{application_id}@example.com"),
        resume_path: Some(format!("resumes/{application_id}_cv.pdf")),
        explanation: None,
        job_description: None,
        resume_text: None,
        candidate_skills: Vec::new(),
        date_of_birth: None,
        year_of_passing: None,
        course: None,
    }
}

fn timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 2, 11)
        .and_then(|d| d.and_hms_opt(9, 15, 0))
        .expect("valid timestamp")
}

// ────────────────────────────────────────────────────────────────────────────
// Routes
// ────────────────────────────────────────────────────────────────────────────

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, detail: &str) -> ApiError {
    (status, Json(json!({ "detail": detail })))
}

fn authorize(backend: &Backend, headers: &HeaderMap) -> Result<User, ApiError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .and_then(|token| backend.user_for(token))
        .ok_or_else(|| api_error(StatusCode::UNAUTHORIZED, "Could not validate credentials"))
}

fn authorize_recruiter(backend: &Backend, headers: &HeaderMap) -> Result<User, ApiError> {
    let user = authorize(backend, headers)?;
    if !user.role.is_privileged() {
        return Err(api_error(StatusCode::FORBIDDEN, "Not enough permissions"));
    }
    Ok(user)
}

async fn record(State(backend): State<Arc<Backend>>, req: Request, next: Next) -> Response {
    let target = req
        .uri()
        .path_and_query()
        .map(|p| p.as_str().to_string())
        .unwrap_or_default();
    backend
        .requests
        .lock()
        .expect("requests lock")
        .push(format!("{} {}", req.method(), target));
    next.run(req).await
}

/// Collects text fields; the `resume` file part is stored as an upload.
async fn read_form(backend: &Backend, mut multipart: Multipart) -> Result<HashMap<String, String>, ApiError> {
    let mut fields = HashMap::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, &e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "resume" {
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let body = field
                .bytes()
                .await
                .map_err(|e| api_error(StatusCode::BAD_REQUEST, &e.to_string()))?
                .to_vec();
            fields.insert(name, file_name.clone().unwrap_or_default());
            backend.uploads.lock().expect("uploads lock").push(Upload {
                file_name,
                content_type,
                body,
            });
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| api_error(StatusCode::BAD_REQUEST, &e.to_string()))?;
            fields.insert(name, text);
        }
    }
    Ok(fields)
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn login(
    State(backend): State<Arc<Backend>>,
    Json(body): Json<LoginBody>,
) -> Result<Json<Value>, ApiError> {
    if body.password != PASSWORD {
        return Err(api_error(StatusCode::UNAUTHORIZED, "Incorrect email or password"));
    }
    let (id, role) = if body.email.starts_with("recruiter") {
        (2, Role::Recruiter)
    } else {
        (11, Role::Candidate)
    };
    let user = User {
        id,
        email: body.email,
        role,
        full_name: None,
    };
    let token = backend.issue_token(user.clone());
    Ok(Json(json!({
        "access_token": token,
        "token_type": "bearer",
        "user": user,
    })))
}

#[derive(Deserialize)]
struct RegisterBody {
    email: String,
    role: Role,
    #[serde(default)]
    full_name: String,
}

async fn register(Json(body): Json<RegisterBody>) -> Result<Json<User>, ApiError> {
    if body.email.starts_with("taken") {
        return Err(api_error(StatusCode::BAD_REQUEST, "Email already registered"));
    }
    Ok(Json(User {
        id: if body.role == Role::Recruiter { 2 } else { 11 },
        email: body.email,
        role: body.role,
        full_name: Some(body.full_name).filter(|n| !n.is_empty()),
    }))
}

async fn list_users(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
) -> Result<Json<Vec<User>>, ApiError> {
    authorize_recruiter(&backend, &headers)?;
    Ok(Json(backend.users.lock().expect("users lock").clone()))
}

async fn delete_user(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Path(user_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    authorize_recruiter(&backend, &headers)?;
    let mut users = backend.users.lock().expect("users lock");
    let before = users.len();
    users.retain(|u| u.id != user_id);
    if users.len() == before {
        return Err(api_error(StatusCode::NOT_FOUND, "User not found"));
    }
    Ok(Json(json!({ "status": "success" })))
}

async fn list_jobs(State(backend): State<Arc<Backend>>) -> Json<Vec<Job>> {
    Json(backend.jobs.lock().expect("jobs lock").clone())
}

async fn score(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<Vec<MatchResult>>, ApiError> {
    let user = authorize(&backend, &headers)?;
    let form = read_form(&backend, multipart).await?;
    let file_name = form
        .get("resume")
        .ok_or_else(|| api_error(StatusCode::UNPROCESSABLE_ENTITY, "resume is required"))?;
    let results = backend.score_results.lock().expect("score lock").clone();
    backend
        .history
        .record_search(Some(user.id), &format!("resumes/{file_name}"), results.clone())
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()))?;
    Ok(Json(results))
}

async fn apply(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    authorize(&backend, &headers)?;
    if backend.slow_apply.load(Ordering::Acquire) {
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
    let form = read_form(&backend, multipart).await?;
    let parse_id = |key: &str| {
        form.get(key)
            .and_then(|v| v.parse::<i64>().ok())
            .ok_or_else(|| api_error(StatusCode::UNPROCESSABLE_ENTITY, &format!("{key} is required")))
    };
    let job_id = parse_id("job_id")?;
    let candidate_id = parse_id("candidate_id")?;
    if !form.contains_key("resume") {
        return Err(api_error(StatusCode::UNPROCESSABLE_ENTITY, "resume is required"));
    }

    let mut applications = backend.applications.lock().expect("applications lock");
    let application_id = applications.iter().map(|a| a.application_id).max().unwrap_or(0) + 1;
    let mut created = application(application_id, ApplicationStatus::Applied, 0.5);
    created.job_id = job_id;
    created.candidate_id = candidate_id;
    applications.push(created);
    Ok(Json(json!({ "status": "success", "application_id": application_id })))
}

async fn list_history(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user = authorize(&backend, &headers)?;
    let entries = backend
        .history
        .list_history(Some(user.id))
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()))?;
    Ok(Json(json!(entries)))
}

async fn delete_history(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Path(search_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    authorize(&backend, &headers)?;
    match backend.history.delete_history(search_id) {
        Ok(_) => Ok(Json(json!({ "status": "success" }))),
        Err(HistoryError::NotFound(_)) => {
            Err(api_error(StatusCode::NOT_FOUND, "Match search not found"))
        }
        Err(e) => Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())),
    }
}

async fn list_applications(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Application>>, ApiError> {
    authorize_recruiter(&backend, &headers)?;
    let filter = query
        .get("status")
        .map(|s| s.parse::<ApplicationStatus>())
        .transpose()
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, &e))?;
    let applications = backend.applications.lock().expect("applications lock");
    Ok(Json(
        applications
            .iter()
            .filter(|a| filter.map_or(true, |s| a.status == s))
            .cloned()
            .collect(),
    ))
}

async fn get_application(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Path(application_id): Path<i64>,
) -> Result<Json<Application>, ApiError> {
    authorize_recruiter(&backend, &headers)?;
    let applications = backend.applications.lock().expect("applications lock");
    applications
        .iter()
        .find(|a| a.application_id == application_id)
        .map(|a| {
            let mut detail = a.clone();
            detail.candidate_skills = vec!["sql".to_string(), "python".to_string()];
            detail.course = Some("B.Sc".to_string());
            Json(detail)
        })
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Application not found"))
}

async fn update_status(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Path(application_id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    authorize_recruiter(&backend, &headers)?;
    let form = read_form(&backend, multipart).await?;
    let status: ApplicationStatus = form
        .get("status")
        .ok_or_else(|| api_error(StatusCode::UNPROCESSABLE_ENTITY, "status is required"))?
        .parse()
        .map_err(|e: String| api_error(StatusCode::BAD_REQUEST, &e))?;

    let mut applications = backend.applications.lock().expect("applications lock");
    let app = applications
        .iter_mut()
        .find(|a| a.application_id == application_id)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Application not found"))?;
    app.status = status;
    Ok(Json(json!({
        "status": "success",
        "application_id": application_id,
        "new_status": status,
        "updated_at": Utc::now().naive_utc(),
    })))
}

async fn delete_application(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Path(application_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    authorize_recruiter(&backend, &headers)?;
    let mut applications = backend.applications.lock().expect("applications lock");
    let before = applications.len();
    applications.retain(|a| a.application_id != application_id);
    if applications.len() == before {
        return Err(api_error(StatusCode::NOT_FOUND, "Application not found"));
    }
    Ok(Json(json!({ "status": "success" })))
}

async fn get_threshold(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
) -> Result<Json<SkillThreshold>, ApiError> {
    authorize(&backend, &headers)?;
    Ok(Json(*backend.threshold.lock().expect("threshold lock")))
}

async fn put_threshold(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Json(body): Json<SkillThreshold>,
) -> Result<Json<SkillThreshold>, ApiError> {
    authorize_recruiter(&backend, &headers)?;
    *backend.threshold.lock().expect("threshold lock") = body;
    Ok(Json(body))
}

pub fn router(backend: Arc<Backend>) -> Router {
    let api = Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .route("/users/recruiter/users", get(list_users))
        .route("/users/recruiter/users/:id", delete(delete_user))
        .route("/jobs", get(list_jobs))
        .route("/applications/score", post(score))
        .route("/applications/apply", post(apply))
        .route("/applications/history", get(list_history))
        .route("/applications/history/:search_id", delete(delete_history))
        .route("/applications/recruiter/applications", get(list_applications))
        .route(
            "/applications/recruiter/applications/:id",
            get(get_application).delete(delete_application),
        )
        .route(
            "/applications/recruiter/applications/:id/status",
            put(update_status),
        )
        .route("/settings/skill_threshold", get(get_threshold).put(put_threshold));

    Router::new()
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(backend.clone(), record))
        .with_state(backend)
}

/// Serves `backend` on 127.0.0.1 and returns the API base URL.
pub async fn spawn(backend: Arc<Backend>) -> String {
    let app = router(backend);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    format!("http://{addr}/api")
}

pub struct Harness {
    pub backend: Arc<Backend>,
    pub store: Arc<MemorySessionStore>,
    pub state: AppState,
}

/// A running backend plus a client state pointed at it. Nobody is logged in yet.
pub async fn harness(backend: Backend, gate: Arc<dyn ConfirmGate>) -> Harness {
    let backend = Arc::new(backend);
    let api_url = spawn(backend.clone()).await;
    let config = Config {
        api_url,
        ..Config::default()
    };
    let store = Arc::new(MemorySessionStore::new());
    let state = AppState::new(config, store.clone(), gate).expect("client state");
    Harness {
        backend,
        store,
        state,
    }
}

impl Harness {
    pub async fn login(&self, email: &str) -> User {
        self.state
            .auth()
            .login(email, PASSWORD)
            .await
            .expect("login succeeds")
    }
}
