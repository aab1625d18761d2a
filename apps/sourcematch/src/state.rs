use std::sync::Arc;

use crate::api_client::ApiClient;
use crate::applications::ApplicationBoard;
use crate::auth::AuthService;
use crate::config::Config;
use crate::confirm::ConfirmGate;
use crate::errors::ClientError;
use crate::history::HistoryPanel;
use crate::jobs::JobBoard;
use crate::matching::MatchingSession;
use crate::session::loading::LoadingFlags;
use crate::session::store::SessionStore;
use crate::session::SessionContext;
use crate::settings::SettingsPanel;
use crate::users::UserAdmin;

/// Shared client state injected into every controller.
#[derive(Clone)]
pub struct AppState {
    pub api: ApiClient,
    /// Asked before every destructive request.
    pub gate: Arc<dyn ConfirmGate>,
    /// One set of flags shared by all controllers built from this state.
    pub loading: LoadingFlags,
    pub config: Config,
}

impl AppState {
    /// Hydrates the session from `store` and builds the API client.
    pub fn new(
        config: Config,
        store: Arc<dyn SessionStore>,
        gate: Arc<dyn ConfirmGate>,
    ) -> Result<Self, ClientError> {
        let session = Arc::new(SessionContext::hydrate(store)?);
        let api = ApiClient::new(config.api_url.clone(), config.request_timeout, session)?;
        Ok(Self {
            api,
            gate,
            loading: LoadingFlags::new(),
            config,
        })
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        self.api.session()
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.api.clone())
    }

    pub fn matching(&self) -> MatchingSession {
        MatchingSession::new(self.api.clone(), self.loading.clone())
    }

    pub fn applications(&self) -> ApplicationBoard {
        ApplicationBoard::new(self.api.clone(), self.gate.clone(), self.loading.clone())
    }

    pub fn history(&self) -> HistoryPanel {
        HistoryPanel::new(self.api.clone(), self.gate.clone(), self.loading.clone())
    }

    pub fn jobs(&self) -> JobBoard {
        JobBoard::new(self.api.clone(), self.gate.clone(), self.loading.clone())
    }

    pub fn users(&self) -> UserAdmin {
        UserAdmin::new(self.api.clone(), self.gate.clone(), self.loading.clone())
    }

    pub fn settings(&self) -> SettingsPanel {
        SettingsPanel::new(self.api.clone(), self.loading.clone())
    }
}
