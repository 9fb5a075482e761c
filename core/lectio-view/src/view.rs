use lectio_highlight::tree::Rendered;
use lectio_highlight::markup::{self, ExerciseCard};
use lectio_highlight::{FoundWords, Glossary, Highlighter, VocabCard};
use lectio_protocol::{
    BookId, Catalog, ContentError, ExerciseId, RegionId, ResultSubmission, Unit, UserProfile,
    VocabEntry,
};
use tracing::debug;

use crate::exercise::{ExerciseBoard, ExerciseError, Verdict};
use crate::narration::{NarrationController, Notice, SpeechFacility, UtteranceId};
use crate::progress::{self, ProgressError, ProgressRecord, ProgressStore};
use crate::reveal::{Reveal, RevealEffect, RevealEvent, RevealFrame};
use crate::speed::ReadingSpeed;

/// Application state of one open unit page.
///
/// Everything here lives exactly as long as the page: navigating away drops
/// the view, and with it found words, the reveal and any narration.
pub struct UnitView<S> {
    book_id: BookId,
    book_title: String,
    unit: Unit,
    highlighter: Highlighter,
    rendered: Rendered,
    found: FoundWords,
    reveal: Reveal,
    speed: ReadingSpeed,
    narration: NarrationController<S>,
    exercises: ExerciseBoard,
}

impl<S: SpeechFacility> UnitView<S> {
    pub fn open(
        catalog: &Catalog,
        book_id: BookId,
        unit_id: &str,
        speech: S,
        speed: ReadingSpeed,
    ) -> Result<Self, ContentError> {
        let (book, unit) = catalog.locate(book_id, unit_id)?;
        let unit = unit.clone();
        let highlighter = Highlighter::new(&unit.vocabulary);
        let rendered = highlighter.highlight_text(&unit.text);
        debug!(book = %book_id, unit = unit_id, regions = rendered.regions.len(), "unit view opened");

        Ok(Self {
            book_id,
            book_title: book.title.clone(),
            exercises: ExerciseBoard::new(&unit.exercises),
            unit,
            highlighter,
            rendered,
            found: FoundWords::new(),
            reveal: Reveal::new(speed.period_ms()),
            speed,
            narration: NarrationController::new(speech, speed),
        })
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn header_markup(&self) -> String {
        markup::render_unit_header(&self.book_title, &self.unit.id, &self.unit.title)
    }

    // --- Text and vocabulary ---

    /// Current render tree. Empty while a reveal is running.
    pub fn rendered(&self) -> &Rendered {
        &self.rendered
    }

    /// Markup for the text section: the reveal frame while skimming, the
    /// highlighted paragraphs otherwise.
    pub fn text_markup(&self) -> String {
        match self.reveal_frame() {
            Some(frame) => markup::render_reveal_frame(frame.visible, frame.masked),
            None => markup::render_text(&self.rendered),
        }
    }

    pub fn found_words(&self) -> &FoundWords {
        &self.found
    }

    pub fn vocab_cards(&self) -> Vec<VocabCard> {
        Glossary::new(&self.unit.vocabulary).cards(&self.found)
    }

    /// Click on a highlighted region.
    pub fn activate_region(&mut self, id: RegionId) -> Option<&VocabEntry> {
        let key = self.rendered.region(id)?.key.clone();
        self.activate_word(&key)
    }

    /// Click on a region or a vocabulary card. Unknown words do nothing.
    pub fn activate_word(&mut self, key: &str) -> Option<&VocabEntry> {
        let entry = Glossary::new(&self.unit.vocabulary).activate(key, &mut self.found)?;
        debug!(word = %entry.word, found = self.found.len(), "vocabulary looked up");
        Some(entry)
    }

    // --- Skimming ---

    pub fn reveal(&self) -> &Reveal {
        &self.reveal
    }

    pub fn reveal_frame(&self) -> Option<RevealFrame<'_>> {
        self.reveal
            .cursor()
            .map(|cursor| RevealFrame::split(&self.unit.text, cursor))
    }

    /// Feeds one event to the reveal and applies its effect to the text.
    pub fn reveal_event(&mut self, event: RevealEvent) -> RevealEffect {
        let (next, effect) = self.reveal.step(event);
        self.reveal = next;
        match effect {
            // Skimming replaces the paragraphs and their regions wholesale
            RevealEffect::Arm { .. } => self.rendered = Rendered::default(),
            RevealEffect::Complete | RevealEffect::Restore => self.restore_text(),
            _ => {}
        }
        effect
    }

    pub fn toggle_reveal(&mut self) -> RevealEffect {
        let len = self.unit.char_len();
        self.reveal_event(RevealEvent::Toggle { len })
    }

    pub fn tick(&mut self) -> RevealEffect {
        self.reveal_event(RevealEvent::Tick)
    }

    fn restore_text(&mut self) {
        let plain = Rendered::plain(self.unit.paragraphs());
        self.rendered = self.highlighter.highlight_blocks(plain.blocks);
    }

    // --- Read aloud ---

    pub fn narration(&self) -> &NarrationController<S> {
        &self.narration
    }

    pub fn narration_mut(&mut self) -> &mut NarrationController<S> {
        &mut self.narration
    }

    /// Reads the full unit text, or stops the current narration.
    pub fn toggle_narration(&mut self) -> Result<Option<UtteranceId>, Notice> {
        self.narration.toggle(&self.unit.text)
    }

    pub fn speed(&self) -> ReadingSpeed {
        self.speed
    }

    /// Applies to the running reveal on its next tick and to the next narration.
    pub fn set_speed(&mut self, speed: ReadingSpeed) -> RevealEffect {
        self.speed = speed;
        self.narration.set_speed(speed);
        self.reveal_event(RevealEvent::SetPeriod(speed.period_ms()))
    }

    // --- Exercises ---

    pub fn exercises(&self) -> &ExerciseBoard {
        &self.exercises
    }

    pub fn select_option(&mut self, exercise: ExerciseId, option: usize) -> Result<(), ExerciseError> {
        self.exercises.select(exercise, option)
    }

    pub fn check_exercise(&mut self, exercise: ExerciseId) -> Result<Verdict, ExerciseError> {
        self.exercises.check(exercise)
    }

    pub fn exercises_markup(&self) -> String {
        let cards: Vec<ExerciseCard<'_>> = self
            .unit
            .exercises
            .iter()
            .enumerate()
            .filter_map(|(i, exercise)| {
                let state = self.exercises.state(ExerciseId(i as u32))?;
                Some(ExerciseCard {
                    exercise,
                    marks: state.marks(),
                    locked: state.is_locked(),
                })
            })
            .collect();
        markup::render_exercises(&cards)
    }

    // --- Persistence and submission ---

    pub fn progress(&self) -> ProgressRecord {
        ProgressRecord {
            found: self.found.iter().map(str::to_string).collect(),
            results: self.exercises.results(),
        }
    }

    pub fn restore_progress(&mut self, record: &ProgressRecord) {
        for word in &record.found {
            self.found.insert(word);
        }
        self.exercises.restore(&record.results);
    }

    /// Applies whatever `store` holds for this user, book and unit.
    pub fn restore_from<P: ProgressStore>(&mut self, store: &P, user_id: &str) -> Result<(), ProgressError> {
        let record = progress::load_progress(store, user_id, self.book_id, &self.unit.id)?;
        self.restore_progress(&record);
        Ok(())
    }

    pub fn save_to<P: ProgressStore>(&self, store: &mut P, user_id: &str) -> Result<(), ProgressError> {
        progress::save_progress(store, user_id, self.book_id, &self.unit.id, &self.progress())
    }

    pub fn submission(&self, profile: &UserProfile) -> ResultSubmission {
        ResultSubmission {
            name: profile.name.clone(),
            surname: profile.surname.clone(),
            group: profile.group.clone(),
            book: self.book_title.clone(),
            unit: self.unit.id.clone(),
            score: self.exercises.score().to_string(),
            answers: Some(self.exercises.answers(&self.unit.exercises)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narration::tests::FakeSpeech;
    use crate::progress::MemoryStore;
    use crate::reveal::Phase;
    use lectio_protocol::{Book, BookStatus, Exercise, GrammarNote};

    fn catalog() -> Catalog {
        Catalog {
            books: vec![Book {
                id: BookId(1),
                title: "Everyday Inventions".to_string(),
                description: String::new(),
                status: BookStatus::Available,
                units: vec![Unit {
                    id: "1.1".to_string(),
                    title: "Zippers".to_string(),
                    text: "A zipper is handy.\n\nThe zipper was invented in 1893.".to_string(),
                    vocabulary: vec![
                        VocabEntry {
                            word: "zipper".to_string(),
                            translation: "zamça".to_string(),
                            ..VocabEntry::default()
                        },
                        VocabEntry {
                            word: "handy".to_string(),
                            translation: "kullanışlı".to_string(),
                            ..VocabEntry::default()
                        },
                    ],
                    grammar: GrammarNote::default(),
                    exercises: vec![Exercise {
                        question: "How many?".to_string(),
                        options: vec!["Ten".to_string(), "Twelve".to_string()],
                        correct: 1,
                    }],
                }],
            }],
        }
    }

    fn open() -> UnitView<FakeSpeech> {
        UnitView::open(&catalog(), BookId(1), "1.1", FakeSpeech::default(), ReadingSpeed::default()).unwrap()
    }

    #[test]
    fn test_bad_identifiers_fail_to_load() {
        let result = UnitView::open(&catalog(), BookId(1), "7.7", FakeSpeech::default(), ReadingSpeed::default());
        assert!(matches!(result, Err(ContentError::UnitNotFound { .. })));
    }

    #[test]
    fn test_clicking_either_zipper_finds_it_once() {
        let mut view = open();
        let zippers: Vec<RegionId> = view.rendered().regions_for("zipper").map(|r| r.id).collect();
        assert_eq!(zippers.len(), 2);

        for id in zippers {
            let entry = view.activate_region(id).unwrap();
            assert_eq!(entry.translation, "zamça");
        }
        assert_eq!(view.found_words().iter().collect::<Vec<_>>(), vec!["zipper"]);
        assert!(view.vocab_cards()[0].found);
        assert!(!view.vocab_cards()[1].found);
    }

    #[test]
    fn test_cancel_at_any_point_restores_regions() {
        let len = open().unit().char_len();
        for stop_at in [0, 1, len / 2, len - 1] {
            let mut view = open();
            let before = view.rendered().clone();

            view.toggle_reveal();
            assert!(view.rendered().regions.is_empty());
            for _ in 0..stop_at {
                view.tick();
            }
            assert_eq!(view.toggle_reveal(), RevealEffect::Restore);
            assert_eq!(view.rendered(), &before);
        }
    }

    #[test]
    fn test_natural_completion_restores_once() {
        let mut view = open();
        let before = view.rendered().clone();
        view.toggle_reveal();

        let mut restores = 0;
        for _ in 0..view.unit().char_len() + 3 {
            if view.tick().restores() {
                restores += 1;
            }
        }
        assert_eq!(restores, 1);
        assert_eq!(view.reveal().phase(), Phase::Idle);
        assert_eq!(view.rendered(), &before);
    }

    #[test]
    fn test_markup_follows_reveal() {
        let mut view = open();
        view.toggle_reveal();
        view.tick();
        view.tick();

        let html = view.text_markup();
        assert!(html.contains("<span>A </span>"));
        assert!(html.contains("color:transparent"));
        // Regions cannot be clicked while skimming
        assert!(view.activate_region(RegionId(0)).is_none());
    }

    #[test]
    fn test_speed_change_rearms_running_reveal() {
        let mut view = open();
        view.toggle_reveal();
        view.tick();

        assert_eq!(view.set_speed(ReadingSpeed::new(2.0)), RevealEffect::Rearm { period_ms: 25 });
        assert_eq!(view.reveal().cursor(), Some(1));
        assert_eq!(view.narration().speed(), ReadingSpeed::new(2.0));
    }

    #[test]
    fn test_narration_reads_the_whole_text() {
        let mut view = open();
        let id = view.toggle_narration().unwrap().unwrap();
        view.narration_mut().on_started(id);

        assert!(view.narration().is_active());
        assert_eq!(view.narration().facility().spoken[0].1, view.unit().text);
        assert_eq!(view.toggle_narration(), Ok(None));
        assert!(!view.narration().is_active());
    }

    #[test]
    fn test_progress_and_submission() {
        let mut view = open();
        view.activate_word("ZIPPER");
        view.select_option(ExerciseId(0), 0).unwrap();
        view.check_exercise(ExerciseId(0)).unwrap();

        let record = view.progress();
        assert_eq!(record.found, vec!["zipper".to_string()]);

        let mut reopened = open();
        reopened.restore_progress(&record);
        assert_eq!(reopened.progress(), record);

        let profile = UserProfile::from_form("Ann", "Lee", "B-12", 1).unwrap();
        let submission = view.submission(&profile);
        assert_eq!(submission.book, "Everyday Inventions");
        assert_eq!(submission.score, "0/1");
        assert_eq!(submission.answers.unwrap().len(), 1);
    }

    #[test]
    fn test_progress_survives_reopening_through_store() {
        let mut store = MemoryStore::new();
        let mut view = open();
        view.activate_word("handy");
        view.select_option(ExerciseId(0), 1).unwrap();
        view.check_exercise(ExerciseId(0)).unwrap();
        view.save_to(&mut store, "7").unwrap();
        assert!(store.get("progress:7:1:1.1").unwrap().is_some());

        let mut reopened = open();
        reopened.restore_from(&store, "7").unwrap();
        assert_eq!(reopened.progress(), view.progress());
        assert_eq!(reopened.exercises().score().to_string(), "1/1");

        let mut stranger = open();
        stranger.restore_from(&store, "8").unwrap();
        assert!(stranger.progress().found.is_empty());
    }

    #[test]
    fn test_checked_exercise_markup_is_locked() {
        let mut view = open();
        let fresh = view.exercises_markup();
        assert!(fresh.contains("exercises-grid"));
        assert!(!fresh.contains("disabled"));

        view.select_option(ExerciseId(0), 0).unwrap();
        view.check_exercise(ExerciseId(0)).unwrap();
        let checked = view.exercises_markup();
        assert!(checked.contains(r#"<div class="option selected incorrect" data-index="0">"#));
        assert!(checked.contains(r#"<div class="option correct" data-index="1">"#));
        assert!(checked.contains(r#"<button class="check-btn" data-ex="0" disabled>"#));
    }
}
