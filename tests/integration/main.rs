//! Integration tests for Sitescope
//!
//! These tests use wiremock to create mock HTTP servers and run complete
//! scrapes end-to-end.

mod config_tests;
mod scrape_tests;
