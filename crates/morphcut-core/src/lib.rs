//! MorphCut Core - Foundation types for the transition engine
//!
//! This crate provides the fundamental types used throughout MorphCut:
//! - Frame buffers (RGBA8 pixel data)
//! - Frame rates and duration-to-frame arithmetic
//! - The error taxonomy shared by every crate

pub mod error;
pub mod frame;
pub mod time;

pub use error::{MorphcutError, Result};
pub use frame::Frame;
pub use time::FrameRate;
