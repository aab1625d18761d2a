//! Login, registration and logout on top of the shared session context.

use tracing::info;

use crate::api_client::ApiClient;
use crate::errors::ClientError;
use crate::models::user::{LoginRequest, RegisterRequest, Role, User};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Registration form input.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Role,
}

impl Registration {
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.email.trim().is_empty() {
            return Err(ClientError::Validation("Email is required".to_string()));
        }
        if self.password != self.confirm_password {
            return Err(ClientError::Validation("Passwords do not match".to_string()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ClientError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if self.role == Role::Admin {
            return Err(ClientError::Validation(
                "Role must be candidate or recruiter".to_string(),
            ));
        }
        Ok(())
    }
}

pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Logs in and persists the token and user profile.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ClientError> {
        let response = self
            .api
            .login(&LoginRequest {
                email: email.trim().to_string(),
                password: password.to_string(),
            })
            .await?;
        self.api
            .session()
            .establish(response.access_token, response.user.clone())?;
        info!("Logged in as {} ({})", response.user.email, response.user.role);
        Ok(response.user)
    }

    /// Registers a new account, then logs straight in with it.
    pub async fn register(&self, registration: &Registration) -> Result<User, ClientError> {
        registration.validate()?;
        let created = self
            .api
            .register(&RegisterRequest {
                email: registration.email.trim().to_string(),
                password: registration.password.clone(),
                role: registration.role,
                full_name: registration.full_name.trim().to_string(),
            })
            .await?;
        info!("Registered user {} as {}", created.id, created.role);
        self.login(&registration.email, &registration.password).await
    }

    pub fn logout(&self) -> bool {
        self.api.session().logout()
    }

    pub fn current_user(&self) -> Option<User> {
        self.api.session().current_user()
    }
}

/// Ensures the logged-in user may perform recruiter-only actions.
///
/// Checked locally so that a candidate never triggers a 403, which would end
/// the session.
pub(crate) fn require_privileged(api: &ApiClient, action: &str) -> Result<User, ClientError> {
    match api.session().current_user() {
        Some(user) if user.role.is_privileged() => Ok(user),
        Some(_) => Err(ClientError::Validation(format!(
            "Only recruiters can {action}"
        ))),
        None => Err(ClientError::Validation(format!("Please log in to {action}"))),
    }
}
