//! Skimming: progressive character-by-character reveal of a unit text.
//!
//! [`Reveal::step`] is a pure transition function. It never touches a timer or
//! the page; the caller applies the returned [`RevealEffect`].

use serde::Serialize;
use tracing::debug;

use crate::speed::{BASE_PERIOD_MS, MIN_PERIOD_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// `cursor` characters of `len` are visible. `0 <= cursor < len`.
    Revealing { cursor: usize, len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealEvent {
    /// Begin revealing a text of `len` characters. Ignored while revealing.
    Start { len: usize },
    /// Start when idle, cancel when revealing.
    Toggle { len: usize },
    Tick,
    Cancel,
    SetPeriod(u32),
}

/// What the caller must do after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum RevealEffect {
    None,
    /// Start the periodic timer.
    Arm { period_ms: u32 },
    /// Replace the running timer; the cursor is kept.
    Rearm { period_ms: u32 },
    /// Show `cursor` characters.
    Render { cursor: usize },
    /// Cursor reached the end: stop the timer, restore and re-highlight.
    Complete,
    /// Cancelled: stop the timer, restore and re-highlight.
    Restore,
}

impl RevealEffect {
    /// True for the two effects that end a reveal.
    pub fn restores(self) -> bool {
        matches!(self, RevealEffect::Complete | RevealEffect::Restore)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reveal {
    phase: Phase,
    period_ms: u32,
}

impl Default for Reveal {
    fn default() -> Self {
        Self::new(BASE_PERIOD_MS)
    }
}

impl Reveal {
    pub fn new(period_ms: u32) -> Self {
        Self {
            phase: Phase::Idle,
            period_ms: period_ms.max(MIN_PERIOD_MS),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Revealing { .. })
    }

    pub fn cursor(&self) -> Option<usize> {
        match self.phase {
            Phase::Revealing { cursor, .. } => Some(cursor),
            Phase::Idle => None,
        }
    }

    pub fn step(self, event: RevealEvent) -> (Self, RevealEffect) {
        let (next, effect) = match (self.phase, event) {
            (Phase::Idle, RevealEvent::Start { len } | RevealEvent::Toggle { len }) => {
                if len == 0 {
                    (self, RevealEffect::None)
                } else {
                    let next = Self {
                        phase: Phase::Revealing { cursor: 0, len },
                        ..self
                    };
                    (next, RevealEffect::Arm { period_ms: self.period_ms })
                }
            }
            (Phase::Revealing { .. }, RevealEvent::Start { .. }) => (self, RevealEffect::None),
            (Phase::Revealing { .. }, RevealEvent::Toggle { .. } | RevealEvent::Cancel) => {
                (self.idle(), RevealEffect::Restore)
            }
            (Phase::Revealing { cursor, len }, RevealEvent::Tick) => {
                let cursor = cursor + 1;
                if cursor >= len {
                    (self.idle(), RevealEffect::Complete)
                } else {
                    let next = Self {
                        phase: Phase::Revealing { cursor, len },
                        ..self
                    };
                    (next, RevealEffect::Render { cursor })
                }
            }
            // Late timer callbacks after a stop
            (Phase::Idle, RevealEvent::Tick | RevealEvent::Cancel) => (self, RevealEffect::None),
            (phase, RevealEvent::SetPeriod(period_ms)) => {
                let next = Self {
                    period_ms: period_ms.max(MIN_PERIOD_MS),
                    ..self
                };
                let effect = match phase {
                    Phase::Revealing { .. } => RevealEffect::Rearm { period_ms: next.period_ms },
                    Phase::Idle => RevealEffect::None,
                };
                (next, effect)
            }
        };

        if next.phase != self.phase && !matches!(effect, RevealEffect::Render { .. }) {
            debug!(?event, ?effect, "reveal phase changed");
        }
        (next, effect)
    }

    fn idle(self) -> Self {
        Self {
            phase: Phase::Idle,
            ..self
        }
    }
}

/// A text split at the reveal cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealFrame<'a> {
    pub visible: &'a str,
    /// Rendered invisibly so the layout does not reflow.
    pub masked: &'a str,
}

impl<'a> RevealFrame<'a> {
    /// Splits after `cursor` characters; cursors past the end show everything.
    pub fn split(text: &'a str, cursor: usize) -> Self {
        let at = text
            .char_indices()
            .nth(cursor)
            .map_or(text.len(), |(offset, _)| offset);
        let (visible, masked) = text.split_at(at);
        Self { visible, masked }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run(mut reveal: Reveal, events: &[RevealEvent]) -> (Reveal, Vec<RevealEffect>) {
        let mut effects = Vec::new();
        for event in events {
            let (next, effect) = reveal.step(*event);
            reveal = next;
            effects.push(effect);
        }
        (reveal, effects)
    }

    #[test]
    fn test_full_reveal_completes_once() {
        let mut events = vec![RevealEvent::Start { len: 3 }];
        events.extend([RevealEvent::Tick; 5]);
        let (reveal, effects) = run(Reveal::default(), &events);

        assert_eq!(
            effects,
            vec![
                RevealEffect::Arm { period_ms: 50 },
                RevealEffect::Render { cursor: 1 },
                RevealEffect::Render { cursor: 2 },
                RevealEffect::Complete,
                RevealEffect::None,
                RevealEffect::None,
            ]
        );
        assert_eq!(reveal.phase(), Phase::Idle);
    }

    #[test]
    fn test_start_while_revealing_is_ignored() {
        let (reveal, effects) = run(
            Reveal::default(),
            &[RevealEvent::Start { len: 10 }, RevealEvent::Tick, RevealEvent::Start { len: 10 }],
        );
        assert_eq!(effects[2], RevealEffect::None);
        assert_eq!(reveal.cursor(), Some(1));
    }

    #[test]
    fn test_toggle_stops_and_restores() {
        let (reveal, effects) = run(
            Reveal::default(),
            &[RevealEvent::Toggle { len: 10 }, RevealEvent::Tick, RevealEvent::Toggle { len: 10 }],
        );
        assert_eq!(effects[2], RevealEffect::Restore);
        assert!(!reveal.is_active());
    }

    #[test]
    fn test_speed_change_keeps_cursor() {
        let (reveal, effects) = run(
            Reveal::default(),
            &[
                RevealEvent::Start { len: 10 },
                RevealEvent::Tick,
                RevealEvent::Tick,
                RevealEvent::SetPeriod(25),
                RevealEvent::Tick,
            ],
        );
        assert_eq!(effects[3], RevealEffect::Rearm { period_ms: 25 });
        assert_eq!(effects[4], RevealEffect::Render { cursor: 3 });
        assert_eq!(reveal.period_ms(), 25);
    }

    #[test]
    fn test_idle_period_change_applies_to_next_start() {
        let (_, effects) = run(
            Reveal::default(),
            &[RevealEvent::SetPeriod(1), RevealEvent::Start { len: 4 }],
        );
        assert_eq!(effects, vec![RevealEffect::None, RevealEffect::Arm { period_ms: MIN_PERIOD_MS }]);
    }

    #[test]
    fn test_empty_text_never_starts() {
        let (reveal, effects) = run(Reveal::default(), &[RevealEvent::Start { len: 0 }]);
        assert_eq!(effects, vec![RevealEffect::None]);
        assert!(!reveal.is_active());
    }

    #[test]
    fn test_frame_splits_on_char_boundaries() {
        let frame = RevealFrame::split("zamça var", 5);
        assert_eq!(frame.visible, "zamça");
        assert_eq!(frame.masked, " var");
        assert_eq!(RevealFrame::split("abc", 0).visible, "");
        assert_eq!(RevealFrame::split("abc", 7).masked, "");
    }

    proptest! {
        #[test]
        fn test_cursor_is_monotonic(len in 1usize..200, period_changes in proptest::collection::vec(5u32..200, 0..5)) {
            let mut reveal = Reveal::default();
            reveal = reveal.step(RevealEvent::Start { len }).0;
            let mut last = 0;
            let mut completions = 0;
            let mut changes = period_changes.into_iter();

            for tick in 0..(len + 10) {
                if tick % 7 == 3 {
                    if let Some(period) = changes.next() {
                        reveal = reveal.step(RevealEvent::SetPeriod(period)).0;
                    }
                }
                let (next, effect) = reveal.step(RevealEvent::Tick);
                reveal = next;
                match effect {
                    RevealEffect::Render { cursor } => {
                        prop_assert!(cursor > last);
                        prop_assert!(cursor < len);
                        last = cursor;
                    }
                    RevealEffect::Complete => completions += 1,
                    _ => {}
                }
            }
            prop_assert_eq!(completions, 1);
            prop_assert!(!reveal.is_active());
        }
    }
}
