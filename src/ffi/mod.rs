//! FFI module for the darknet inference engine.
//!
//! This module holds the raw binding surface: C-layout mirrors of the
//! engine's records and one `extern "C"` declaration per exported symbol.
//! The safe wrappers live in `network`, `frame` and `detector`; nothing
//! outside this crate should need to touch the raw declarations directly.

pub mod types;

#[cfg(feature = "ffi")]
pub(crate) mod bindings;

pub use types::{RawBox, RawDetection, RawImage, RawMetadata};
