//! Shared utilities.
//!
//! Test helpers live here; they are compiled for tests only.

#[cfg(test)]
pub mod testutil;
