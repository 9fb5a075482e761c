use std::collections::BTreeSet;

use lectio_protocol::VocabEntry;
use serde::Serialize;

/// Lower-cased vocabulary words the learner has located in the current unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FoundWords(BTreeSet<String>);

impl FoundWords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the word was already present.
    pub fn insert(&mut self, word: &str) -> bool {
        self.0.insert(word.to_lowercase())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for FoundWords {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut found = FoundWords::new();
        for word in iter {
            found.insert(word.as_ref());
        }
        found
    }
}

/// Entry in the vocabulary section of a unit page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VocabCard {
    pub word: String,
    pub translation: String,
    pub found: bool,
}

/// Case-insensitive lookup over a unit's vocabulary.
pub struct Glossary<'a> {
    entries: &'a [VocabEntry],
}

impl<'a> Glossary<'a> {
    pub fn new(entries: &'a [VocabEntry]) -> Self {
        Self { entries }
    }

    /// First entry whose word equals `key` ignoring case.
    pub fn lookup(&self, key: &str) -> Option<&'a VocabEntry> {
        let key = key.trim().to_lowercase();
        self.entries.iter().find(|e| e.word.trim().to_lowercase() == key)
    }

    /// Resolves `key` and marks it found. Unknown keys are a silent no-op.
    pub fn activate(&self, key: &str, found: &mut FoundWords) -> Option<&'a VocabEntry> {
        let entry = self.lookup(key)?;
        found.insert(entry.word.trim());
        Some(entry)
    }

    pub fn cards(&self, found: &FoundWords) -> Vec<VocabCard> {
        self.entries
            .iter()
            .map(|e| VocabCard {
                word: e.word.clone(),
                translation: e.translation.clone(),
                found: found.contains(e.word.trim()),
            })
            .collect()
    }
}
