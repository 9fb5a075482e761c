//! HTML rendering of render trees and unit page sections.
//!
//! Every section is an askama template with HTML auto-escaping, so catalog
//! text can never break the produced markup.

use askama::Template;
use tracing::warn;

use lectio_protocol::{Book, Exercise, GrammarNote, OptionMarks, UserProfile, VocabEntry};

use crate::glossary::VocabCard;
use crate::tree::{Rendered, Segment};

fn render<T: Template>(template: &T) -> String {
    template.render().unwrap_or_else(|err| {
        warn!(error = %err, "section markup failed to render");
        String::new()
    })
}

struct Piece<'a> {
    text: &'a str,
    is_vocab: bool,
    key: &'a str,
    region: u32,
}

#[derive(Template)]
#[template(
    source = r#"{% for block in blocks %}<p>{% for piece in block %}{% if piece.is_vocab %}<span class="vocab-word" data-word="{{ piece.key }}" data-region="{{ piece.region }}">{{ piece.text }}</span>{% else %}{{ piece.text }}{% endif %}{% endfor %}</p>{% endfor %}"#,
    ext = "html"
)]
struct TextTemplate<'a> {
    blocks: Vec<Vec<Piece<'a>>>,
}

/// `<p>` per block, `<span class="vocab-word">` per region.
pub fn render_text(rendered: &Rendered) -> String {
    let blocks = rendered
        .blocks
        .iter()
        .map(|block| {
            block
                .segments
                .iter()
                .map(|segment| match segment {
                    Segment::Text { text } => Piece {
                        text,
                        is_vocab: false,
                        key: "",
                        region: 0,
                    },
                    Segment::Vocab { region, key, surface } => Piece {
                        text: surface,
                        is_vocab: true,
                        key,
                        region: region.0,
                    },
                })
                .collect()
        })
        .collect();
    render(&TextTemplate { blocks })
}

#[derive(Template)]
#[template(
    source = r#"<p class="reveal-frame" style="white-space: pre-wrap"><span>{{ visible }}</span><span style="color:transparent">{{ masked }}</span></p>"#,
    ext = "html"
)]
struct RevealFrameTemplate<'a> {
    visible: &'a str,
    masked: &'a str,
}

/// Skimming frame: the masked suffix keeps its layout space but is invisible.
pub fn render_reveal_frame(visible: &str, masked: &str) -> String {
    render(&RevealFrameTemplate { visible, masked })
}

#[derive(Template)]
#[template(
    source = r#"<div class="error-message"><i class="fas fa-exclamation-triangle"></i><p>{{ message }}</p></div>"#,
    ext = "html"
)]
struct ErrorTemplate<'a> {
    message: &'a str,
}

pub fn render_error_block(message: &str) -> String {
    render(&ErrorTemplate { message })
}

#[derive(Template)]
#[template(
    source = r#"<div class="section-header"><h3><i class="fas fa-book"></i> Vocabulary Builder</h3></div><div class="vocabulary-grid">{% for card in cards %}<div class="vocab-card{% if card.found %} found{% endif %}" data-word="{{ card.word.to_lowercase() }}"><div class="word">{{ card.word }}</div><div class="translation">{{ card.translation }}</div></div>{% endfor %}</div>"#,
    ext = "html"
)]
struct VocabCardsTemplate<'a> {
    cards: &'a [VocabCard],
}

pub fn render_vocab_cards(cards: &[VocabCard]) -> String {
    render(&VocabCardsTemplate { cards })
}

#[derive(Template)]
#[template(
    source = r#"<h2>{{ entry.word }}</h2><p><strong>Meaning:</strong> {{ entry.translation }}</p><p><strong>Definition:</strong> {{ entry.definition }}</p><p><strong>Example:</strong> "{{ entry.example }}"</p>"#,
    ext = "html"
)]
struct VocabPopupTemplate<'a> {
    entry: &'a VocabEntry,
}

pub fn render_vocab_popup(entry: &VocabEntry) -> String {
    render(&VocabPopupTemplate { entry })
}

#[derive(Template)]
#[template(
    source = r#"<div class="section-header"><h3><i class="fas fa-pen-alt"></i> Grammar Focus</h3></div><h4>{{ note.theme }}</h4><p>{{ note.description }}</p><ul>{% for example in note.examples %}<li>{{ example }}</li>{% endfor %}</ul>"#,
    ext = "html"
)]
struct GrammarTemplate<'a> {
    note: &'a GrammarNote,
}

/// Empty grammar notes render nothing so the section can be hidden.
pub fn render_grammar(note: &GrammarNote) -> String {
    if note.is_empty() {
        return String::new();
    }
    render(&GrammarTemplate { note })
}

/// One exercise together with its current check state.
#[derive(Debug, Clone, Copy)]
pub struct ExerciseCard<'a> {
    pub exercise: &'a Exercise,
    pub marks: &'a [OptionMarks],
    pub locked: bool,
}

struct OptionRow<'a> {
    index: usize,
    letter: char,
    classes: String,
    text: &'a str,
}

struct ExerciseRow<'a> {
    index: usize,
    question: &'a str,
    options: Vec<OptionRow<'a>>,
    locked: bool,
}

#[derive(Template)]
#[template(
    source = r#"<div class="section-header"><h3><i class="fas fa-clipboard-check"></i> Exercises</h3></div><div class="exercises-grid">{% for ex in exercises %}<div class="exercise-card" data-ex="{{ ex.index }}"><h4>{{ ex.question }}</h4>{% for option in ex.options %}<div class="{{ option.classes }}" data-index="{{ option.index }}"><span class="option-letter">{{ option.letter }}</span><span>{{ option.text }}</span></div>{% endfor %}<button class="check-btn" data-ex="{{ ex.index }}"{% if ex.locked %} disabled{% endif %}>Check</button></div>{% endfor %}</div>"#,
    ext = "html"
)]
struct ExercisesTemplate<'a> {
    exercises: Vec<ExerciseRow<'a>>,
}

pub fn render_exercises(cards: &[ExerciseCard<'_>]) -> String {
    let exercises = cards
        .iter()
        .enumerate()
        .map(|(index, card)| ExerciseRow {
            index,
            question: &card.exercise.question,
            options: card
                .exercise
                .options
                .iter()
                .enumerate()
                .map(|(i, text)| OptionRow {
                    index: i,
                    letter: Exercise::option_letter(i),
                    classes: card.marks.get(i).copied().unwrap_or_default().css_classes(),
                    text,
                })
                .collect(),
            locked: card.locked,
        })
        .collect();
    render(&ExercisesTemplate { exercises })
}

#[derive(Template)]
#[template(
    source = r#"<div class="book-card {{ status }}" data-book="{{ book.id }}"><div class="book-cover"><i class="fas fa-book-open"></i></div><div class="book-info"><h3>{{ book.title }}</h3><p>{{ book.description }}</p><div class="book-status {{ status }}">{{ label }}</div></div></div>"#,
    ext = "html"
)]
struct BookCardTemplate<'a> {
    book: &'a Book,
    status: &'static str,
    label: &'static str,
}

pub fn render_book_card(book: &Book) -> String {
    render(&BookCardTemplate {
        book,
        status: book.status.css_class(),
        label: book.status.label(),
    })
}

#[derive(Template)]
#[template(
    source = "<h1>{{ book_title }}</h1><h2>Unit {{ unit_id }}: {{ unit_title }}</h2><p>Read the text and complete the tasks below</p>",
    ext = "html"
)]
struct UnitHeaderTemplate<'a> {
    book_title: &'a str,
    unit_id: &'a str,
    unit_title: &'a str,
}

pub fn render_unit_header(book_title: &str, unit_id: &str, unit_title: &str) -> String {
    render(&UnitHeaderTemplate {
        book_title,
        unit_id,
        unit_title,
    })
}

#[derive(Template)]
#[template(
    source = r#"<div class="user-details"><div class="user-name">{{ name }}</div><div class="user-group">{{ group }}</div></div>"#,
    ext = "html"
)]
struct UserInfoTemplate<'a> {
    name: String,
    group: &'a str,
}

/// Signed-in reader shown on the books and unit pages.
pub fn render_user_info(profile: &UserProfile) -> String {
    render(&UserInfoTemplate {
        name: profile.display_name(),
        group: &profile.group,
    })
}
