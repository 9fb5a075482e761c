use alloc::string::String;
use core::fmt;

use crate::ids::BookId;

/// Failure to produce a renderable unit from the content store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    /// The catalog document could not be fetched or decoded.
    Unavailable(String),
    BookNotFound(BookId),
    UnitNotFound { book: BookId, unit: String },
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentError::Unavailable(reason) => write!(f, "Catalog unavailable: {}", reason),
            ContentError::BookNotFound(id) => write!(f, "Book {} not found", id),
            ContentError::UnitNotFound { book, unit } => {
                write!(f, "Unit {} not found in book {}", unit, book)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ContentError {}
