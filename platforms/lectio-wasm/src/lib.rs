pub mod storage;

use std::fmt::Display;

use lectio_highlight::markup;
use lectio_protocol::{BookId, Catalog, ExerciseId, RegionId, UserProfile};
use lectio_view::progress;
use lectio_view::route::{self, unit_href};
use lectio_view::{
    catalog_from_archive, catalog_from_json, NarrationError, ReadingSpeed, RevealEffect,
    SpeechFacility, UnitView, UtteranceId,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub use storage::{LocalStorage, StorageError};

fn js_error<E: Display>(e: E) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn open_storage() -> Result<LocalStorage, JsValue> {
    LocalStorage::open().map_err(js_error)
}

fn stored_profile(store: &LocalStorage) -> Result<Option<UserProfile>, JsValue> {
    progress::load_profile(store).map_err(js_error)
}

#[wasm_bindgen]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Decides what the page at `path` should show. Returns
/// `{ "render": { "page": ... } }` or `{ "redirect": "/" }`.
///
/// An unreadable stored identity counts as signed out, so the login page
/// can overwrite it.
#[wasm_bindgen]
pub fn resolve_route(path: &str, query: &str) -> Result<JsValue, JsValue> {
    let has_profile = matches!(stored_profile(&open_storage()?), Ok(Some(_)));
    Ok(serde_wasm_bindgen::to_value(&route::resolve(path, query, has_profile))?)
}

/// Validates the login form and stores the identity under `readingUser`.
#[wasm_bindgen]
pub fn create_profile(name: &str, surname: &str, group: &str, now_ms: f64) -> Result<JsValue, JsValue> {
    let profile = UserProfile::from_form(name, surname, group, now_ms as u64).map_err(js_error)?;
    progress::save_profile(&mut open_storage()?, &profile).map_err(js_error)?;
    Ok(serde_wasm_bindgen::to_value(&profile)?)
}

/// The signed-in identity, or `undefined`.
#[wasm_bindgen]
pub fn load_profile() -> Result<JsValue, JsValue> {
    Ok(serde_wasm_bindgen::to_value(&stored_profile(&open_storage()?)?)?)
}

/// The `user-details` block for the page header, or `None` when signed out.
#[wasm_bindgen]
pub fn user_info_markup() -> Result<Option<String>, JsValue> {
    Ok(stored_profile(&open_storage()?)?.as_ref().map(markup::render_user_info))
}

/// The book last opened from the catalog page.
#[wasm_bindgen]
pub fn current_book() -> Result<Option<u32>, JsValue> {
    let book = progress::load_current_book(&open_storage()?).map_err(js_error)?;
    Ok(book.map(|b| b.0))
}

#[wasm_bindgen(module = "/js/speech.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    fn speak(id: u32, text: &str, rate: f32) -> Result<(), JsValue>;

    fn cancel_speech();
}

/// Web Speech API behind the engine's speech seam.
pub struct BrowserSpeech;

impl SpeechFacility for BrowserSpeech {
    fn speak(&mut self, id: UtteranceId, text: &str, rate: f32) -> Result<(), NarrationError> {
        speak(id.0, text, rate).map_err(|_| NarrationError::Unavailable)
    }

    fn cancel(&mut self) {
        cancel_speech();
    }
}

/// Catalog loaded once per page.
#[wasm_bindgen]
pub struct ReaderEngine {
    catalog: Catalog,
}

#[wasm_bindgen]
impl ReaderEngine {
    /// From the raw `{ books: [...] }` document.
    pub fn from_json(json: &str) -> Result<ReaderEngine, JsValue> {
        let catalog = catalog_from_json(json).map_err(js_error)?;
        Ok(Self { catalog })
    }

    /// From a `catalog-compiler` archive fetched as bytes.
    pub fn from_archive(bytes: &[u8]) -> Result<ReaderEngine, JsValue> {
        let catalog = catalog_from_archive(bytes).map_err(js_error)?;
        Ok(Self { catalog })
    }

    pub fn books_markup(&self) -> String {
        self.catalog.books.iter().map(markup::render_book_card).collect()
    }

    /// Link to the first unit of an available book. `None` means the book
    /// cannot be opened yet.
    pub fn book_href(&self, book: u32) -> Option<String> {
        let book = self.catalog.book(BookId(book)).filter(|b| b.is_available())?;
        book.first_unit().map(|unit| unit_href(book.id, &unit.id))
    }

    /// Like `book_href`, and remembers the book as `currentBook`.
    pub fn open_book(&self, book: u32) -> Result<Option<String>, JsValue> {
        let Some(href) = self.book_href(book) else {
            return Ok(None);
        };
        progress::save_current_book(&mut open_storage()?, BookId(book)).map_err(js_error)?;
        Ok(Some(href))
    }

    /// Opens a unit page and restores the signed-in user's progress. A
    /// missing book or unit yields the error block markup as the error value.
    pub fn open_unit(&self, book: u32, unit: &str, speed: f32) -> Result<UnitSession, JsValue> {
        let mut view = UnitView::open(&self.catalog, BookId(book), unit, BrowserSpeech, ReadingSpeed::new(speed))
            .map_err(|e| JsValue::from_str(&markup::render_error_block(&e.to_string())))?;
        let store = open_storage()?;
        let profile = stored_profile(&store)?;
        if let Some(profile) = &profile {
            view.restore_from(&store, &profile.id).map_err(js_error)?;
        }
        Ok(UnitSession { view, store, profile })
    }
}

#[derive(Serialize)]
struct RegionInfo<'a> {
    id: u32,
    key: &'a str,
}

/// One open unit page.
#[wasm_bindgen]
pub struct UnitSession {
    view: UnitView<BrowserSpeech>,
    store: LocalStorage,
    profile: Option<UserProfile>,
}

impl UnitSession {
    /// Writes the current progress for the signed-in user. Without one there
    /// is nowhere to file it.
    fn persist(&mut self) -> Result<(), JsValue> {
        match &self.profile {
            Some(profile) => self.view.save_to(&mut self.store, &profile.id).map_err(js_error),
            None => Ok(()),
        }
    }
}

#[wasm_bindgen]
impl UnitSession {
    pub fn header_markup(&self) -> String {
        self.view.header_markup()
    }

    pub fn text_markup(&self) -> String {
        self.view.text_markup()
    }

    pub fn grammar_markup(&self) -> String {
        markup::render_grammar(&self.view.unit().grammar)
    }

    pub fn vocabulary_markup(&self) -> String {
        markup::render_vocab_cards(&self.view.vocab_cards())
    }

    pub fn exercises_markup(&self) -> String {
        self.view.exercises_markup()
    }

    /// Clickable regions of the current text, in document order.
    pub fn regions(&self) -> Result<JsValue, JsValue> {
        let regions: Vec<RegionInfo> = self
            .view
            .rendered()
            .regions
            .iter()
            .map(|r| RegionInfo { id: r.id.0, key: &r.key })
            .collect();
        Ok(serde_wasm_bindgen::to_value(&regions)?)
    }

    /// Popup markup for a clicked region, or `None` if it no longer exists.
    pub fn activate_region(&mut self, region: u32) -> Result<Option<String>, JsValue> {
        let popup = self
            .view
            .activate_region(RegionId(region))
            .map(markup::render_vocab_popup);
        self.persist()?;
        Ok(popup)
    }

    /// Popup markup for a clicked vocabulary card.
    pub fn activate_word(&mut self, word: &str) -> Result<Option<String>, JsValue> {
        let popup = self.view.activate_word(word).map(markup::render_vocab_popup);
        self.persist()?;
        Ok(popup)
    }

    pub fn is_revealing(&self) -> bool {
        self.view.reveal().is_active()
    }

    /// Returns the effect the page applies, e.g. `{ "effect": "arm", "period_ms": 50 }`.
    pub fn toggle_reveal(&mut self) -> Result<JsValue, JsValue> {
        effect_value(self.view.toggle_reveal())
    }

    pub fn tick(&mut self) -> Result<JsValue, JsValue> {
        effect_value(self.view.tick())
    }

    pub fn set_speed(&mut self, speed: f32) -> Result<JsValue, JsValue> {
        effect_value(self.view.set_speed(ReadingSpeed::new(speed)))
    }

    pub fn speed(&self) -> f32 {
        self.view.speed().rate()
    }

    pub fn is_narrating(&self) -> bool {
        self.view.narration().is_active()
    }

    /// Starts or stops read-aloud. Errors carry the message to show.
    pub fn toggle_narration(&mut self) -> Result<Option<u32>, JsValue> {
        self.view
            .toggle_narration()
            .map(|id| id.map(|id| id.0))
            .map_err(|notice| JsValue::from_str(&notice.message))
    }

    pub fn narration_started(&mut self, id: u32) {
        self.view.narration_mut().on_started(UtteranceId(id));
    }

    pub fn narration_finished(&mut self, id: u32) {
        self.view.narration_mut().on_finished(UtteranceId(id));
    }

    pub fn narration_failed(&mut self, id: u32, message: &str) -> Option<String> {
        self.view
            .narration_mut()
            .on_error(UtteranceId(id), message)
            .map(|notice| notice.message)
    }

    pub fn select_option(&mut self, exercise: u32, option: usize) -> Result<(), JsValue> {
        self.view.select_option(ExerciseId(exercise), option).map_err(js_error)
    }

    /// `{ "verdict": "correct" }` or `{ "verdict": "incorrect", "correct": 1 }`.
    pub fn check_exercise(&mut self, exercise: u32) -> Result<JsValue, JsValue> {
        let verdict = self.view.check_exercise(ExerciseId(exercise)).map_err(js_error)?;
        self.persist()?;
        Ok(serde_wasm_bindgen::to_value(&verdict)?)
    }

    pub fn score(&self) -> String {
        self.view.exercises().score().to_string()
    }

    pub fn progress(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.view.progress())?)
    }

    /// Body for `POST /api/submit`, or `undefined` when signed out.
    pub fn submission(&self) -> Result<JsValue, JsValue> {
        let submission = self.profile.as_ref().map(|profile| self.view.submission(profile));
        Ok(serde_wasm_bindgen::to_value(&submission)?)
    }
}

fn effect_value(effect: RevealEffect) -> Result<JsValue, JsValue> {
    Ok(serde_wasm_bindgen::to_value(&effect)?)
}
