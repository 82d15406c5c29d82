// Shared test support code for scenario tests.

pub mod common;
pub mod storage;

pub use common::*;
pub use storage::FaultyStorage;
