//! Read-aloud lifecycle on top of a platform speech facility.

use thiserror::Error;
use tracing::{debug, warn};

use crate::speed::ReadingSpeed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtteranceId(pub u32);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NarrationError {
    #[error("Speech synthesis is not available in this browser")]
    Unavailable,
    #[error("Speech synthesis failed: {0}")]
    Failed(String),
}

/// The platform text-to-speech service.
pub trait SpeechFacility {
    /// Queue `text` for speaking. Lifecycle signals for `id` are reported back
    /// through [`NarrationController::on_started`] and friends.
    fn speak(&mut self, id: UtteranceId, text: &str, rate: f32) -> Result<(), NarrationError>;

    /// Stop whatever is being spoken.
    fn cancel(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrationState {
    Idle,
    /// Submitted, waiting for the facility's start signal.
    Pending(UtteranceId),
    Speaking(UtteranceId),
}

/// Non-fatal message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

impl From<NarrationError> for Notice {
    fn from(e: NarrationError) -> Self {
        Self { message: e.to_string() }
    }
}

pub struct NarrationController<S> {
    facility: S,
    state: NarrationState,
    speed: ReadingSpeed,
    next_id: u32,
}

impl<S: SpeechFacility> NarrationController<S> {
    pub fn new(facility: S, speed: ReadingSpeed) -> Self {
        Self {
            facility,
            state: NarrationState::Idle,
            speed,
            next_id: 0,
        }
    }

    pub fn state(&self) -> NarrationState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != NarrationState::Idle
    }

    pub fn speed(&self) -> ReadingSpeed {
        self.speed
    }

    pub fn facility(&self) -> &S {
        &self.facility
    }

    /// Used by the next `start`; an utterance in progress keeps its rate.
    pub fn set_speed(&mut self, speed: ReadingSpeed) {
        self.speed = speed;
    }

    /// Speaks `text`. Blank text is ignored and returns `Ok(None)`.
    pub fn start(&mut self, text: &str) -> Result<Option<UtteranceId>, Notice> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        if self.is_active() {
            // Never two narrations at once
            self.facility.cancel();
        }

        let id = UtteranceId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        match self.facility.speak(id, text, self.speed.rate()) {
            Ok(()) => {
                self.state = NarrationState::Pending(id);
                debug!(utterance = id.0, rate = self.speed.rate(), "narration submitted");
                Ok(Some(id))
            }
            Err(e) => {
                warn!(error = %e, "narration could not start");
                self.state = NarrationState::Idle;
                Err(e.into())
            }
        }
    }

    pub fn stop(&mut self) {
        if self.is_active() {
            self.facility.cancel();
            debug!("narration stopped");
        }
        self.state = NarrationState::Idle;
    }

    /// Stop when active, start otherwise.
    pub fn toggle(&mut self, text: &str) -> Result<Option<UtteranceId>, Notice> {
        if self.is_active() {
            self.stop();
            Ok(None)
        } else {
            self.start(text)
        }
    }

    pub fn on_started(&mut self, id: UtteranceId) {
        if self.state == NarrationState::Pending(id) {
            self.state = NarrationState::Speaking(id);
        }
    }

    pub fn on_finished(&mut self, id: UtteranceId) {
        if self.is_current(id) {
            self.state = NarrationState::Idle;
        }
    }

    /// Returns a notice for the current utterance; stale errors are dropped.
    pub fn on_error(&mut self, id: UtteranceId, message: &str) -> Option<Notice> {
        if !self.is_current(id) {
            return None;
        }
        self.state = NarrationState::Idle;
        let error = NarrationError::Failed(message.to_string());
        warn!(utterance = id.0, error = %error, "narration failed");
        Some(error.into())
    }

    fn is_current(&self, id: UtteranceId) -> bool {
        matches!(self.state, NarrationState::Pending(c) | NarrationState::Speaking(c) if c == id)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Records calls instead of speaking.
    #[derive(Default)]
    pub struct FakeSpeech {
        pub spoken: Vec<(UtteranceId, String, f32)>,
        pub cancels: usize,
        pub unavailable: bool,
    }

    impl SpeechFacility for FakeSpeech {
        fn speak(&mut self, id: UtteranceId, text: &str, rate: f32) -> Result<(), NarrationError> {
            if self.unavailable {
                return Err(NarrationError::Unavailable);
            }
            self.spoken.push((id, text.to_string(), rate));
            Ok(())
        }

        fn cancel(&mut self) {
            self.cancels += 1;
        }
    }

    #[test]
    fn test_lifecycle() {
        let mut narration = NarrationController::new(FakeSpeech::default(), ReadingSpeed::default());
        let id = narration.start("A zipper is handy.").unwrap().unwrap();
        assert_eq!(narration.state(), NarrationState::Pending(id));

        narration.on_started(id);
        assert_eq!(narration.state(), NarrationState::Speaking(id));

        narration.on_finished(id);
        assert_eq!(narration.state(), NarrationState::Idle);
    }

    #[test]
    fn test_blank_text_is_ignored() {
        let mut narration = NarrationController::new(FakeSpeech::default(), ReadingSpeed::default());
        assert_eq!(narration.start("  \n "), Ok(None));
        assert!(narration.facility().spoken.is_empty());
    }

    #[test]
    fn test_restart_cancels_previous_utterance() {
        let mut narration = NarrationController::new(FakeSpeech::default(), ReadingSpeed::default());
        let first = narration.start("one").unwrap().unwrap();
        narration.on_started(first);
        let second = narration.start("two").unwrap().unwrap();

        assert_eq!(narration.facility().cancels, 1);
        // The old utterance's end signal no longer matters
        narration.on_finished(first);
        assert_eq!(narration.state(), NarrationState::Pending(second));
    }

    #[test]
    fn test_rate_change_applies_to_next_start() {
        let mut narration = NarrationController::new(FakeSpeech::default(), ReadingSpeed::default());
        let id = narration.start("text").unwrap().unwrap();
        narration.on_started(id);
        narration.set_speed(ReadingSpeed::new(1.5));
        assert_eq!(narration.facility().spoken.len(), 1);

        narration.toggle("text").unwrap();
        narration.toggle("text").unwrap();
        assert_eq!(narration.facility().spoken[1].2, 1.5);
    }

    #[test]
    fn test_errors_surface_a_notice_and_reset() {
        let mut narration = NarrationController::new(FakeSpeech::default(), ReadingSpeed::default());
        let id = narration.start("text").unwrap().unwrap();
        let notice = narration.on_error(id, "synthesis-failed").unwrap();
        assert!(notice.message.contains("synthesis-failed"));
        assert!(!narration.is_active());

        let mut unavailable = NarrationController::new(
            FakeSpeech {
                unavailable: true,
                ..FakeSpeech::default()
            },
            ReadingSpeed::default(),
        );
        assert!(unavailable.start("text").is_err());
        assert_eq!(unavailable.state(), NarrationState::Idle);
    }
}
