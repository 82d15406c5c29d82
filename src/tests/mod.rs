//! Scenario tests for starcache.
//!
//! End-to-end checks of round-trips, expiry, namespace isolation, failure
//! absorption and file persistence through the public cache API.

mod cases_file_storage_test;

pub mod support;
