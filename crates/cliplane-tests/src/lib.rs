//! Integration test crate for Cliplane.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on the core, timeline and playback crates to verify they
//! work together.

#[cfg(test)]
mod timeline;
