//! Integration test crate for MorphCut.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on multiple morphcut crates to verify they work together.

#[cfg(test)]
mod effects;

#[cfg(test)]
mod engine;
