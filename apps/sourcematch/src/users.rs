use std::sync::Arc;

use tracing::{info, warn};

use crate::api_client::ApiClient;
use crate::auth::require_privileged;
use crate::confirm::{ConfirmGate, DeleteOutcome};
use crate::errors::ClientError;
use crate::models::user::User;
use crate::session::loading::{LoadCategory, LoadingFlags};

pub const DELETE_USER_PROMPT: &str = "Are you sure you want to permanently delete this user and all their data? This action cannot be undone.";

/// Recruiter-side user administration.
pub struct UserAdmin {
    api: ApiClient,
    gate: Arc<dyn ConfirmGate>,
    loading: LoadingFlags,
    users: Vec<User>,
}

impl UserAdmin {
    pub fn new(api: ApiClient, gate: Arc<dyn ConfirmGate>, loading: LoadingFlags) -> Self {
        Self {
            api,
            gate,
            loading,
            users: Vec::new(),
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub async fn refresh(&mut self) -> Result<&[User], ClientError> {
        let _loading = self.loading.begin(LoadCategory::Users);
        self.users = self.api.list_users().await?;
        info!("Loaded {} users", self.users.len());
        Ok(&self.users)
    }

    pub async fn delete(&mut self, user_id: i64) -> Result<DeleteOutcome, ClientError> {
        require_privileged(&self.api, "delete users")?;
        if !self.gate.confirm(DELETE_USER_PROMPT).await {
            return Ok(DeleteOutcome::Declined);
        }

        {
            let _loading = self.loading.begin(LoadCategory::Users);
            self.api.delete_user(user_id).await?;
        }
        info!("User {user_id} deleted");

        self.users.retain(|u| u.id != user_id);
        if let Err(e) = self.refresh().await {
            warn!("Refetch after deleting user failed: {e}");
        }
        Ok(DeleteOutcome::Deleted)
    }
}
