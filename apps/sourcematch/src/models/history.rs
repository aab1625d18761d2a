use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::deserialize_timestamp;
use crate::scoring::ScoreValue;

/// Scoring-engine explanation attached to a match. Unknown keys are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub matched_skills: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One job in a ranked scoring response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub job_id: i64,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub score: ScoreValue,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub matched_skills: Vec<String>,
    #[serde(default)]
    pub explanation: Option<Explanation>,
}

impl MatchResult {
    pub fn percent(&self) -> u8 {
        self.score.percent()
    }

    pub fn summary(&self) -> Option<&str> {
        self.explanation.as_ref()?.summary.as_deref()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A persisted scoring search and its ranked results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHistoryEntry {
    pub search_id: i64,
    #[serde(default)]
    pub candidate_id: Option<i64>,
    #[serde(default)]
    pub resume_path: Option<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: NaiveDateTime,
    /// Ranking order as produced by the scoring engine.
    #[serde(default)]
    pub results: Vec<MatchResult>,
}

impl SearchHistoryEntry {
    /// Last path component of `resume_path`, accepting either separator.
    pub fn resume_file_name(&self) -> Option<&str> {
        let path = self.resume_path.as_deref()?;
        path.rsplit(['/', '\\']).next().filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(path: Option<&str>) -> SearchHistoryEntry {
        serde_json::from_value(json!({
            "search_id": 4,
            "candidate_id": null,
            "resume_path": path,
            "fingerprint": "ab12",
            "created_at": "2025-01-05T08:00:00",
            "results": [
                {"job_id": 9, "job_title": "ML Engineer", "score": 0.91, "matched_skills": null, "explanation": {"matched_skills": ["python"], "semantic": 0.8}},
                {"job_id": 3, "job_title": "Analyst", "score": 0.4, "matched_skills": ["sql"], "explanation": {}}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_history_entry_decodes_and_keeps_order() {
        let e = entry(Some("resumes/x.pdf"));
        let ids: Vec<i64> = e.results.iter().map(|r| r.job_id).collect();
        assert_eq!(ids, vec![9, 3]);
        assert!(e.results[0].matched_skills.is_empty());
        let extra = &e.results[0].explanation.as_ref().unwrap().extra;
        assert!(extra.contains_key("semantic"));
    }

    #[test]
    fn test_resume_file_name_handles_both_separators() {
        assert_eq!(entry(Some("resumes/abc_cv.pdf")).resume_file_name(), Some("abc_cv.pdf"));
        assert_eq!(entry(Some("C:\\resumes\\cv.pdf")).resume_file_name(), Some("cv.pdf"));
        assert_eq!(entry(None).resume_file_name(), None);
    }
}
