//! Key-value persistence of identity and per-unit learning progress.

use std::collections::{BTreeMap, HashMap};
use std::convert::Infallible;
use std::fmt::Display;

use lectio_protocol::{BookId, SessionError, UserProfile};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::exercise::StoredResult;

pub const USER_KEY: &str = "readingUser";
pub const CURRENT_BOOK_KEY: &str = "currentBook";

/// `progress:<user>:<book>:<unit>`
pub fn progress_key(user_id: &str, book: BookId, unit: &str) -> String {
    format!("progress:{}:{}:{}", user_id, book, unit)
}

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("storage backend failed: {0}")]
    Backend(String),
    #[error("stored value is unreadable: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Abstract persistence backend. The browser build stores into `localStorage`.
pub trait ProgressStore {
    type Error: Display;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for MemoryStore {
    type Error = Infallible;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Everything remembered about one (user, book, unit).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressRecord {
    pub found: Vec<String>,
    pub results: BTreeMap<String, StoredResult>,
}

fn backend<E: Display>(e: E) -> ProgressError {
    ProgressError::Backend(e.to_string())
}

fn read_json<S, T>(store: &S, key: &str) -> Result<Option<T>, ProgressError>
where
    S: ProgressStore,
    T: for<'de> Deserialize<'de>,
{
    match store.get(key).map_err(backend)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

fn write_json<S: ProgressStore, T: Serialize>(store: &mut S, key: &str, value: &T) -> Result<(), ProgressError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw).map_err(backend)
}

/// A stored identity that fails to decode is reported as
/// [`SessionError::CorruptProfile`].
pub fn load_profile<S: ProgressStore>(store: &S) -> Result<Option<UserProfile>, ProgressError> {
    match store.get(USER_KEY).map_err(backend)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| SessionError::CorruptProfile(e.to_string()).into()),
        None => Ok(None),
    }
}

pub fn save_profile<S: ProgressStore>(store: &mut S, profile: &UserProfile) -> Result<(), ProgressError> {
    write_json(store, USER_KEY, profile)
}

pub fn load_current_book<S: ProgressStore>(store: &S) -> Result<Option<BookId>, ProgressError> {
    read_json(store, CURRENT_BOOK_KEY)
}

pub fn save_current_book<S: ProgressStore>(store: &mut S, book: BookId) -> Result<(), ProgressError> {
    write_json(store, CURRENT_BOOK_KEY, &book)
}

pub fn load_progress<S: ProgressStore>(
    store: &S,
    user_id: &str,
    book: BookId,
    unit: &str,
) -> Result<ProgressRecord, ProgressError> {
    Ok(read_json(store, &progress_key(user_id, book, unit))?.unwrap_or_default())
}

pub fn save_progress<S: ProgressStore>(
    store: &mut S,
    user_id: &str,
    book: BookId,
    unit: &str,
    record: &ProgressRecord,
) -> Result<(), ProgressError> {
    write_json(store, &progress_key(user_id, book, unit), record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_round_trip_through_store() {
        let mut store = MemoryStore::new();
        assert_eq!(load_profile(&store).unwrap(), None);

        let profile = UserProfile::from_form("Ann", "Lee", "B-12", 42).unwrap();
        save_profile(&mut store, &profile).unwrap();
        assert_eq!(load_profile(&store).unwrap(), Some(profile));
    }

    #[test]
    fn test_current_book_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(load_current_book(&store).unwrap(), None);

        save_current_book(&mut store, BookId(3)).unwrap();
        assert_eq!(load_current_book(&store).unwrap(), Some(BookId(3)));
        assert_eq!(store.get(CURRENT_BOOK_KEY).unwrap().as_deref(), Some("3"));
    }

    #[test]
    fn test_progress_is_scoped_by_book_and_unit() {
        let mut store = MemoryStore::new();
        let record = ProgressRecord {
            found: vec!["zipper".to_string()],
            ..ProgressRecord::default()
        };
        save_progress(&mut store, "42", BookId(1), "1.1", &record).unwrap();

        assert_eq!(load_progress(&store, "42", BookId(1), "1.1").unwrap(), record);
        assert_eq!(load_progress(&store, "42", BookId(1), "1.2").unwrap(), ProgressRecord::default());
        assert!(store.get("progress:42:1:1.1").unwrap().is_some());
    }

    #[test]
    fn test_corrupt_values_are_reported() {
        let mut store = MemoryStore::new();
        store.set(USER_KEY, "{not json").unwrap();
        assert!(matches!(
            load_profile(&store),
            Err(ProgressError::Session(SessionError::CorruptProfile(_)))
        ));

        store.set("progress:42:1:1.1", "[1, 2").unwrap();
        assert!(matches!(
            load_progress(&store, "42", BookId(1), "1.1"),
            Err(ProgressError::Decode(_))
        ));
    }
}
