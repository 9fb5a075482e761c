//! Loading the static catalog document.

use lectio_protocol::{Catalog, ContentError};
use rkyv::{AlignedVec, Deserialize};
use tracing::{debug, warn};

/// Parses the `{ books: [...] }` JSON document.
pub fn catalog_from_json(json: &str) -> Result<Catalog, ContentError> {
    let catalog: Catalog = serde_json::from_str(json).map_err(|e| {
        warn!(error = %e, "catalog JSON rejected");
        ContentError::Unavailable(e.to_string())
    })?;
    debug!(books = catalog.books.len(), "catalog loaded from JSON");
    Ok(catalog)
}

/// Loads a catalog compiled by `catalog-compiler`. The archive is validated
/// before use.
pub fn catalog_from_archive(bytes: &[u8]) -> Result<Catalog, ContentError> {
    // Fetched bytes carry no alignment guarantee
    let mut aligned = AlignedVec::with_capacity(bytes.len());
    aligned.extend_from_slice(bytes);

    let archived = rkyv::check_archived_root::<Catalog>(&aligned).map_err(|e| {
        warn!(error = %e, "catalog archive rejected");
        ContentError::Unavailable(e.to_string())
    })?;
    let catalog: Catalog = archived
        .deserialize(&mut rkyv::Infallible)
        .map_err(|_| ContentError::Unavailable("catalog archive could not be decoded".to_string()))?;
    debug!(books = catalog.books.len(), "catalog loaded from archive");
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectio_protocol::{Book, BookId, BookStatus};

    #[test]
    fn test_archive_and_json_agree() {
        let json = r#"{ "books": [ { "id": 1, "title": "Reader", "description": "d",
            "status": "available", "units": [ { "id": "1.1", "title": "T", "text": "Hello." } ] } ] }"#;
        let from_json = catalog_from_json(json).unwrap();

        let bytes = rkyv::to_bytes::<_, 1024>(&from_json).unwrap();
        let from_archive = catalog_from_archive(&bytes).unwrap();

        assert_eq!(from_json, from_archive);
        assert_eq!(from_archive.books[0].status, BookStatus::Available);
    }

    #[test]
    fn test_garbage_is_a_content_error() {
        assert!(matches!(catalog_from_json("<html>"), Err(ContentError::Unavailable(_))));
        assert!(matches!(catalog_from_archive(&[1, 2, 3]), Err(ContentError::Unavailable(_))));
    }

    #[test]
    fn test_unknown_status_is_coming_soon() {
        let catalog = catalog_from_json(r#"{ "books": [ { "id": 5, "status": "draft" } ] }"#).unwrap();
        let book: &Book = catalog.book(BookId(5)).unwrap();
        assert!(!book.is_available());
        assert_eq!(book.status.label(), "Coming Soon");
    }
}
