//! Application status transitions.
//!
//! ```text
//! applied ──► shortlisted
//!    │
//!    └──────► rejected
//! ```
//!
//! `shortlisted` and `rejected` are terminal and `applied` is never a
//! user-initiated target.

use thiserror::Error;

use crate::models::application::ApplicationStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("an application cannot be moved back to 'applied'")]
    NotUserInitiated,

    #[error("application is already {from}; its status can no longer change")]
    Terminal { from: ApplicationStatus },
}

impl ApplicationStatus {
    /// Validates a recruiter-requested status change and returns the new status.
    pub fn transition(self, to: ApplicationStatus) -> Result<ApplicationStatus, TransitionError> {
        if to == ApplicationStatus::Applied {
            return Err(TransitionError::NotUserInitiated);
        }
        if self.is_terminal() {
            return Err(TransitionError::Terminal { from: self });
        }
        Ok(to)
    }

    /// Targets currently reachable from this status.
    pub fn next_statuses(self) -> &'static [ApplicationStatus] {
        match self {
            ApplicationStatus::Applied => &[ApplicationStatus::Shortlisted, ApplicationStatus::Rejected],
            ApplicationStatus::Shortlisted | ApplicationStatus::Rejected => &[],
        }
    }
}
