use tracing::{info, warn};

use crate::api_client::ApiClient;
use crate::auth::require_privileged;
use crate::errors::ClientError;
use crate::models::settings::SkillThreshold;
use crate::session::loading::{LoadCategory, LoadingFlags};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SaveOutcome {
    Saved(SkillThreshold),
    /// Input equals the current value; nothing was sent.
    Unchanged,
}

/// Skill similarity threshold used by the scoring engine.
pub struct SettingsPanel {
    api: ApiClient,
    loading: LoadingFlags,
    /// Last value fetched from or accepted by the server.
    threshold: Option<SkillThreshold>,
}

impl SettingsPanel {
    pub fn new(api: ApiClient, loading: LoadingFlags) -> Self {
        Self {
            api,
            loading,
            threshold: None,
        }
    }

    /// `None` until [`load`](Self::load) or [`save`](Self::save) succeeds.
    pub fn threshold(&self) -> Option<SkillThreshold> {
        self.threshold
    }

    /// Fetches the current threshold. On failure the previous value is kept.
    pub async fn load(&mut self) -> Result<SkillThreshold, ClientError> {
        let _loading = self.loading.begin(LoadCategory::Settings);
        match self.api.get_skill_threshold().await {
            Ok(threshold) => {
                self.threshold = Some(threshold);
                Ok(threshold)
            }
            Err(e) => {
                warn!("Failed to load skill threshold: {e}");
                Err(e)
            }
        }
    }

    /// Validates `input` and saves it unless it equals the last known server value.
    pub async fn save(&mut self, input: &str) -> Result<SaveOutcome, ClientError> {
        let requested = SkillThreshold::parse(input).map_err(ClientError::Validation)?;
        if self.threshold == Some(requested) {
            return Ok(SaveOutcome::Unchanged);
        }
        require_privileged(&self.api, "modify settings")?;

        let _loading = self.loading.begin(LoadCategory::Settings);
        let saved = self.api.set_skill_threshold(requested).await?;
        info!("Skill threshold set to {}", saved.skill_threshold);
        self.threshold = Some(saved);
        Ok(SaveOutcome::Saved(saved))
    }
}
