pub mod board;
pub mod lifecycle;
pub mod stats;

pub use board::{ApplicationBoard, StatusFilter};
pub use lifecycle::TransitionError;
pub use stats::{ApplicationStats, TopCandidate};
