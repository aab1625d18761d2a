use std::cmp::Ordering;

use serde::Serialize;

use crate::models::application::{Application, ApplicationStatus};

pub const TOP_CANDIDATES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopCandidate {
    pub application_id: i64,
    pub candidate_name: String,
    pub job_title: String,
    pub percent: u8,
}

/// Recruiter overview of the currently loaded applications.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationStats {
    pub total: usize,
    pub applied: usize,
    pub shortlisted: usize,
    pub rejected: usize,
    /// Mean of the normalized percentages, `None` when there are no applications.
    pub average_percent: Option<u8>,
    /// Highest raw scores first.
    pub top: Vec<TopCandidate>,
}

impl ApplicationStats {
    pub fn from_applications(applications: &[Application]) -> Self {
        let count = |status: ApplicationStatus| {
            applications.iter().filter(|a| a.status == status).count()
        };

        let average_percent = if applications.is_empty() {
            None
        } else {
            let sum: u32 = applications.iter().map(|a| u32::from(a.percent())).sum();
            let mean = f64::from(sum) / applications.len() as f64;
            Some((mean + 0.5).floor() as u8)
        };

        let mut ranked: Vec<&Application> = applications.iter().collect();
        ranked.sort_by(|a, b| sort_key(b).partial_cmp(&sort_key(a)).unwrap_or(Ordering::Equal));
        let top = ranked
            .into_iter()
            .take(TOP_CANDIDATES)
            .map(|a| TopCandidate {
                application_id: a.application_id,
                candidate_name: a.candidate_name.clone(),
                job_title: a.job_title.clone(),
                percent: a.percent(),
            })
            .collect();

        Self {
            total: applications.len(),
            applied: count(ApplicationStatus::Applied),
            shortlisted: count(ApplicationStatus::Shortlisted),
            rejected: count(ApplicationStatus::Rejected),
            average_percent,
            top,
        }
    }
}

fn sort_key(app: &Application) -> f64 {
    let raw = app.score.raw();
    if raw.is_nan() {
        0.0
    } else {
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ScoreValue;
    use chrono::NaiveDate;

    fn app(id: i64, status: ApplicationStatus, score: f64) -> Application {
        Application {
            application_id: id,
            job_id: 1,
            candidate_id: id,
            score: ScoreValue(score),
            status,
            created_at: NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            job_title: "Engineer".to_string(),
            candidate_name: format!("cand-{id}"),
            candidate_email: format!("c{id}@example.com"),
            resume_path: None,
            explanation: None,
            job_description: None,
            resume_text: None,
            candidate_skills: vec![],
            date_of_birth: None,
            year_of_passing: None,
            course: None,
        }
    }

    #[test]
    fn test_counts_per_status() {
        let apps = vec![
            app(1, ApplicationStatus::Applied, 0.5),
            app(2, ApplicationStatus::Shortlisted, 0.9),
            app(3, ApplicationStatus::Rejected, 0.1),
            app(4, ApplicationStatus::Applied, 0.7),
        ];
        let stats = ApplicationStats::from_applications(&apps);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.applied, 2);
        assert_eq!(stats.shortlisted, 1);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.average_percent, Some(55));
    }

    #[test]
    fn test_top_is_capped_and_ordered_by_raw_score() {
        let apps: Vec<Application> = (1..=7)
            .map(|i| app(i, ApplicationStatus::Applied, i as f64 / 10.0))
            .collect();
        let stats = ApplicationStats::from_applications(&apps);
        let ids: Vec<i64> = stats.top.iter().map(|t| t.application_id).collect();
        assert_eq!(ids, vec![7, 6, 5, 4, 3]);
        assert_eq!(stats.top[0].percent, 70);
    }

    #[test]
    fn test_empty_has_no_average() {
        let stats = ApplicationStats::from_applications(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.average_percent, None);
        assert!(stats.top.is_empty());
    }
}
