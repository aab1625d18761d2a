pub mod resume;
pub mod session;

pub use resume::ResumeArtifact;
pub use session::{MatchingSession, ScoredMatch, TOP_MATCHES};
