//! Integration tests for Problem-Harvest
//!
//! Every test runs the harvester against a wiremock server standing in for
//! the question bank.

mod crawl_tests;
