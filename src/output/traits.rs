//! Output traits and error types
//!
//! `PageRecord` is the contract between the stats store and whatever
//! per-page record it accumulates. The store only needs a key and a
//! create-or-accumulate pair; the record's fields are its own business.

use crate::crawler::PageResponse;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Errors raised while recording a page
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Page response has an empty key")]
    EmptyKey,
}

/// A per-page record that can be built from and folded with responses
pub trait PageRecord: Clone + Send + 'static {
    /// Identity under which responses are accumulated
    fn key(response: &PageResponse) -> String {
        response.url.clone()
    }

    /// Creates a record from the first response for a key
    fn from_response(response: &PageResponse) -> Self;

    /// Folds a later response for the same key into this record
    fn accumulate(&mut self, response: &PageResponse);
}
