//! Page-level state for the Lectio reader: skimming, read-aloud, exercises,
//! routing and progress persistence around the highlight engine.

pub mod content;
pub mod exercise;
pub mod narration;
pub mod progress;
pub mod reveal;
pub mod route;
pub mod speed;
pub mod view;

pub use content::{catalog_from_archive, catalog_from_json};
pub use exercise::{check_answer, ExerciseBoard, ExerciseError, Score, Verdict};
pub use narration::{NarrationController, NarrationError, NarrationState, Notice, SpeechFacility, UtteranceId};
pub use progress::{MemoryStore, ProgressError, ProgressRecord, ProgressStore};
pub use reveal::{Phase, Reveal, RevealEffect, RevealEvent, RevealFrame};
pub use route::{Navigation, Route};
pub use speed::ReadingSpeed;
pub use view::UnitView;
