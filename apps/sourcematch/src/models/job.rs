use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_EXPERIENCE_LEVEL: &str = "Mid-level";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub salary_min: Option<i64>,
    #[serde(default)]
    pub salary_max: Option<i64>,
    #[serde(default = "default_experience_level")]
    pub experience_level: String,
    /// Comma-delimited on the wire. Use [`Job::skills`] for the parsed list.
    #[serde(default)]
    pub required_skills: Option<String>,
    #[serde(default)]
    pub requirements: Value,
}

fn default_experience_level() -> String {
    DEFAULT_EXPERIENCE_LEVEL.to_string()
}

impl Job {
    /// Required skills in listing order, trimmed, empties dropped.
    pub fn skills(&self) -> Vec<String> {
        self.required_skills
            .as_deref()
            .map(split_skills)
            .unwrap_or_default()
    }

    /// `"50000 - 80000"`, `"from 50000"`, `"up to 80000"` or `None`.
    pub fn salary_range(&self) -> Option<String> {
        match (self.salary_min, self.salary_max) {
            (Some(min), Some(max)) => Some(format!("{min} - {max}")),
            (Some(min), None) => Some(format!("from {min}")),
            (None, Some(max)) => Some(format!("up to {max}")),
            (None, None) => None,
        }
    }
}

pub fn split_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Body of `POST /jobs`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_max: Option<i64>,
    pub experience_level: String,
    #[serde(
        serialize_with = "serialize_skills",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub required_skills: Vec<String>,
}

fn serialize_skills<S: serde::Serializer>(skills: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&skills.join(", "))
}

impl NewJob {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            experience_level: DEFAULT_EXPERIENCE_LEVEL.to_string(),
            ..Default::default()
        }
    }

    /// Required-field checks done before posting.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Job title is required".to_string());
        }
        if self.description.trim().is_empty() {
            return Err("Job description is required".to_string());
        }
        if let (Some(min), Some(max)) = (self.salary_min, self.salary_max) {
            if min > max {
                return Err("Minimum salary cannot exceed maximum salary".to_string());
            }
        }
        Ok(())
    }
}
