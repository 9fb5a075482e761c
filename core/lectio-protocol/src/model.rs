use rkyv::{Archive, Deserialize, Serialize};
use crate::ids::{BookId, ExerciseId};
use crate::error::ContentError;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// Blank-line delimiter between paragraphs of a unit text.
pub const PARAGRAPH_DELIMITER: &str = "\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum BookStatus {
    Available = 0,
    // Anything the catalog does not call "available" is shown as upcoming.
    #[default]
    #[cfg_attr(feature = "serde", serde(other))]
    ComingSoon = 1,
}

impl BookStatus {
    pub fn label(self) -> &'static str {
        match self {
            BookStatus::Available => "Available Now",
            BookStatus::ComingSoon => "Coming Soon",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            BookStatus::Available => "available",
            BookStatus::ComingSoon => "coming-soon",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[archive(check_bytes)]
pub struct VocabEntry {
    pub word: String,
    pub translation: String,
    pub definition: String,
    pub example: String,
}

impl VocabEntry {
    /// Lower-cased lookup key used by highlight regions and FoundWords.
    pub fn key(&self) -> String {
        self.word.to_lowercase()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[archive(check_bytes)]
pub struct GrammarNote {
    pub theme: String,
    pub description: String,
    pub examples: Vec<String>,
}

impl GrammarNote {
    pub fn is_empty(&self) -> bool {
        self.theme.is_empty() && self.description.is_empty() && self.examples.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[archive(check_bytes)]
pub struct Exercise {
    pub question: String,
    pub options: Vec<String>,
    #[cfg_attr(feature = "serde", serde(alias = "correctIndex"))]
    pub correct: u32,
}

impl Exercise {
    pub fn correct_index(&self) -> usize {
        self.correct as usize
    }

    /// Letter shown next to an option: A, B, C...
    pub fn option_letter(index: usize) -> char {
        char::from_u32('A' as u32 + index as u32).unwrap_or('?')
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[archive(check_bytes)]
pub struct Unit {
    pub id: String,
    pub title: String,
    pub text: String,
    pub vocabulary: Vec<VocabEntry>,
    pub grammar: GrammarNote,
    pub exercises: Vec<Exercise>,
}

impl Unit {
    /// Rendering blocks, one per blank-line separated paragraph.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.text.split(PARAGRAPH_DELIMITER)
    }

    /// Text length in characters, the unit the reveal cursor counts in.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn exercise(&self, id: ExerciseId) -> Option<&Exercise> {
        self.exercises.get(id.0 as usize)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[archive(check_bytes)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub description: String,
    pub status: BookStatus,
    pub units: Vec<Unit>,
}

impl Book {
    pub fn is_available(&self) -> bool {
        self.status == BookStatus::Available
    }

    pub fn unit(&self, unit_id: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == unit_id)
    }

    pub fn first_unit(&self) -> Option<&Unit> {
        self.units.first()
    }
}

/// The static content document: `{ books: [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[archive(check_bytes)]
pub struct Catalog {
    pub books: Vec<Book>,
}

impl Catalog {
    pub fn book(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    /// Resolves a (book, unit) pair. Bad identifiers are a content-load failure.
    pub fn locate(&self, book_id: BookId, unit_id: &str) -> Result<(&Book, &Unit), ContentError> {
        let book = self.book(book_id).ok_or(ContentError::BookNotFound(book_id))?;
        let unit = book
            .unit(unit_id)
            .ok_or_else(|| ContentError::UnitNotFound {
                book: book_id,
                unit: unit_id.to_string(),
            })?;
        Ok((book, unit))
    }
}
