//! URL handling module for Sitescope
//!
//! This module derives the allowed host variants for a seed URL, matches
//! candidate hosts against that allow-list, and resolves discovered links
//! into the absolute form the crawl engine deduplicates on.

mod domain;
mod matcher;
mod resolve;

// Re-export main functions
pub use domain::{extract_domain, prepare_allowed_domains};
pub use matcher::is_domain_allowed;
pub use resolve::{resolve_link, visit_key};
