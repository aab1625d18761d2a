use serde::{Deserialize, Serialize};

pub const DEFAULT_SKILL_THRESHOLD: f64 = 0.62;

/// Body of `GET`/`PUT /settings/skill_threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillThreshold {
    pub skill_threshold: f64,
}

impl Default for SkillThreshold {
    fn default() -> Self {
        Self {
            skill_threshold: DEFAULT_SKILL_THRESHOLD,
        }
    }
}

impl SkillThreshold {
    /// Parses user input; the threshold must be a finite number in `[0, 1]`.
    pub fn parse(input: &str) -> Result<Self, String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err("Value is required".to_string());
        }
        let value: f64 = trimmed.parse().map_err(|_| "Must be a number".to_string())?;
        Self::new(value)
    }

    pub fn new(value: f64) -> Result<Self, String> {
        if !value.is_finite() {
            return Err("Must be a number".to_string());
        }
        if !(0.0..=1.0).contains(&value) {
            return Err("Must be between 0.0 and 1.0".to_string());
        }
        Ok(Self {
            skill_threshold: value,
        })
    }
}
