//! MorphCut Effects - pluggable video transition algorithms
//!
//! Provides the transition trait, the declarative parameter schema with
//! validation, the process-wide effect registry, the factory that turns an
//! effect name plus raw parameters into a ready-to-run instance, and the
//! nine built-in transitions.

pub mod factory;
pub mod params;
pub mod raster;
pub mod registry;
pub mod transition;
pub mod transitions;

pub use factory::Factory;
pub use params::{EffectDescriptor, ParamKind, ParamSpec, ParamValue, ParamValues};
pub use registry::Registry;
pub use transition::{FrameCtx, Transition};
