use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::deserialize_timestamp;
use crate::models::history::Explanation;
use crate::scoring::ScoreValue;

/// Lifecycle status of a job application. See `applications::lifecycle` for the
/// allowed transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Applied,
    Shortlisted,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 3] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::Rejected,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, ApplicationStatus::Applied)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "applied" => Ok(ApplicationStatus::Applied),
            "shortlisted" => Ok(ApplicationStatus::Shortlisted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(format!(
                "Invalid status '{other}'. Must be one of: applied, shortlisted, rejected"
            )),
        }
    }
}

/// A job application as returned by the recruiter endpoints.
///
/// The list endpoint omits the profile fields; the detail endpoint fills them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub application_id: i64,
    pub job_id: i64,
    pub candidate_id: i64,
    #[serde(default)]
    pub score: ScoreValue,
    pub status: ApplicationStatus,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub candidate_name: String,
    #[serde(default)]
    pub candidate_email: String,
    #[serde(default)]
    pub resume_path: Option<String>,
    #[serde(default)]
    pub explanation: Option<Explanation>,

    // Detail-only fields.
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub resume_text: Option<String>,
    #[serde(default)]
    pub candidate_skills: Vec<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub year_of_passing: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
}

impl Application {
    pub fn percent(&self) -> u8 {
        self.score.percent()
    }

    pub fn matched_skills(&self) -> &[String] {
        self.explanation
            .as_ref()
            .map(|e| e.matched_skills.as_slice())
            .unwrap_or(&[])
    }
}

/// Response of `POST /applications/apply`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyAck {
    pub status: String,
    pub application_id: i64,
}

/// Response of `PUT /applications/recruiter/applications/{id}/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusAck {
    pub status: String,
    pub application_id: i64,
    pub new_status: ApplicationStatus,
    #[serde(default)]
    pub updated_at: Option<String>,
}
