use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Candidate,
    Recruiter,
    /// Not assignable at registration, but accepted from the backend.
    Admin,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Candidate => "candidate",
            Role::Recruiter => "recruiter",
            Role::Admin => "admin",
        }
    }

    /// Recruiters and admins may post jobs, review applications and change settings.
    pub const fn is_privileged(self) -> bool {
        matches!(self, Role::Recruiter | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl User {
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.email)
    }
}

/// Body of `POST /users/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub full_name: String,
}

/// Body of `POST /users/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_login_response_decodes() {
        let resp: LoginResponse = serde_json::from_value(json!({
            "access_token": "abc",
            "token_type": "bearer",
            "user": {"id": 3, "email": "r@x.io", "role": "recruiter", "full_name": null}
        }))
        .unwrap();
        assert_eq!(resp.user.role, Role::Recruiter);
        assert_eq!(resp.user.display_name(), "r@x.io");
    }

    #[test]
    fn test_privileged_roles() {
        assert!(Role::Recruiter.is_privileged());
        assert!(Role::Admin.is_privileged());
        assert!(!Role::Candidate.is_privileged());
    }
}
