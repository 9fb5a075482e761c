#![no_std] // Shared by the wasm bindings and native tools

extern crate alloc;

// Enable std if the feature is active (for tests/tools)
#[cfg(feature = "std")]
extern crate std;

pub mod error;
pub mod ids;
pub mod marks;
pub mod session;

// Re-export core types for convenience
pub use error::ContentError;
pub use ids::{BookId, ExerciseId, RegionId};
pub use marks::OptionMarks;
pub use session::{AnswerRecord, ResultSubmission, SessionError, UserProfile};

pub mod model;
pub use model::*;
