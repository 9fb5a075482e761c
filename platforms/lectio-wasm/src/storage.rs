//! `window.localStorage` as the reader's progress store.

use lectio_view::ProgressStore;
use thiserror::Error;
use wasm_bindgen::JsValue;
use web_sys::window;

#[derive(Debug, Error)]
pub enum StorageError {
    /// No window, or storage disabled by the browser.
    #[error("localStorage not available: {0}")]
    NotAvailable(String),

    #[error("localStorage call failed: {0}")]
    Call(String),
}

impl From<JsValue> for StorageError {
    fn from(value: JsValue) -> Self {
        StorageError::Call(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    pub fn open() -> Result<Self, StorageError> {
        let window = window().ok_or_else(|| StorageError::NotAvailable("No window object".into()))?;
        let storage = window
            .local_storage()?
            .ok_or_else(|| StorageError::NotAvailable("storage is disabled".into()))?;
        Ok(Self { storage })
    }
}

impl ProgressStore for LocalStorage {
    type Error = StorageError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.storage.get_item(key)?)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        Ok(self.storage.set_item(key, value)?)
    }
}
