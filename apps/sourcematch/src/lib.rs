//! Client core for the SourceMatch job-matching API: score normalization,
//! application lifecycle, search history and the resume scoring session.

pub mod api_client;
pub mod applications;
pub mod auth;
pub mod config;
pub mod confirm;
pub mod errors;
pub mod history;
pub mod jobs;
pub mod matching;
pub mod models;
pub mod scoring;
pub mod session;
pub mod settings;
pub mod state;
pub mod users;

pub use api_client::ApiClient;
pub use errors::ClientError;
pub use scoring::{normalize, ScoreValue};
pub use state::AppState;
