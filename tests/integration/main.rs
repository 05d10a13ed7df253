//! Integration test harness
//!
//! These tests use wiremock to stand in for the search site and exercise
//! the full pagination loop end-to-end.

mod scrape_tests;
