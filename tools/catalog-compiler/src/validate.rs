use std::collections::HashSet;
use std::fmt;

use lectio_highlight::matcher::Needle;
use lectio_protocol::{BookId, Catalog};

/// A content problem the reader tolerates but an author should fix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub book: BookId,
    pub unit: String,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "book {} unit {}: {}", self.book, self.unit, self.message)
    }
}

pub fn check_catalog(catalog: &Catalog) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut book_ids = HashSet::new();

    for book in &catalog.books {
        if !book_ids.insert(book.id) {
            issues.push(Issue {
                book: book.id,
                unit: "-".to_string(),
                message: "duplicate book id".to_string(),
            });
        }
        if book.is_available() && book.units.is_empty() {
            issues.push(Issue {
                book: book.id,
                unit: "-".to_string(),
                message: "available book has no units".to_string(),
            });
        }

        for unit in &book.units {
            let mut report = |message: String| {
                issues.push(Issue {
                    book: book.id,
                    unit: unit.id.clone(),
                    message,
                })
            };

            if unit.text.trim().is_empty() {
                report("unit text is empty".to_string());
            }

            let mut words = HashSet::new();
            for (i, entry) in unit.vocabulary.iter().enumerate() {
                if !words.insert(entry.key()) {
                    report(format!("vocabulary word '{}' is listed twice", entry.word));
                }
                if Needle::from_entry(i, entry).is_none() {
                    report(format!("vocabulary word '{}' can never be highlighted", entry.word));
                }
            }

            for (i, exercise) in unit.exercises.iter().enumerate() {
                if exercise.options.is_empty() {
                    report(format!("exercise {} has no options", i));
                } else if exercise.correct_index() >= exercise.options.len() {
                    report(format!(
                        "exercise {} marks option {} correct but has {} options",
                        i,
                        exercise.correct,
                        exercise.options.len()
                    ));
                }
            }
        }
    }

    issues
}
