//! Error types for the darknet runner.
//!
//! This module defines the error type that can occur during network loading,
//! image marshalling, and detection. Configuration errors carry the absolute
//! path that failed so the caller can report exactly which file is missing.
//!
//! The main error type is `DetectorError`, which encompasses all possible
//! error conditions that can occur within the library.

use std::path::PathBuf;
use thiserror::Error;

/// Represents all possible errors that can occur in the darknet runner.
///
/// This enum implements the standard Error trait using thiserror. Native
/// faults that the engine itself never reports (null handles, null result
/// pointers) are surfaced here as explicit variants instead of crashing
/// inside the foreign call.
#[derive(Error, Debug)]
pub enum DetectorError {
    /// The network configuration file does not exist.
    ///
    /// The payload is the absolute form of the path that was checked.
    #[error("Invalid config path `{0}`")]
    InvalidConfigPath(PathBuf),

    /// The network weights file does not exist.
    #[error("Invalid weight path `{0}`")]
    InvalidWeightsPath(PathBuf),

    /// The metadata file does not exist.
    #[error("Invalid data file path `{0}`")]
    InvalidMetadataPath(PathBuf),

    /// A pixel buffer does not match its declared dimensions.
    ///
    /// This error occurs when the length of the flat byte buffer handed to
    /// `ImageFrame::new` is not `width * height * channels`.
    #[error("Invalid image buffer: {width}x{height}x{channels} needs {expected} bytes, got {actual}")]
    InvalidImage {
        width: u32,
        height: u32,
        channels: u32,
        expected: usize,
        actual: usize,
    },

    /// The native loader returned a null network handle.
    ///
    /// This error occurs when the config and weights files exist but the
    /// engine rejects them (malformed config, truncated weights).
    #[error("Failed to load network: the native library returned a null handle")]
    NetworkLoad,

    /// A native call returned a null pointer where data was promised.
    #[error("Native call failed: {0}")]
    NativeCall(&'static str),

    /// A filesystem operation failed while reading metadata companions.
    #[error("Failed to access file: {0}")]
    FileError(#[from] std::io::Error),

    /// An operation needed the native library, but the crate was built
    /// without it.
    ///
    /// This error occurs when:
    /// - The `ffi` feature is disabled
    /// - A detector or native image is requested anyway
    #[error("Native inference not available. Enable the 'ffi' feature.")]
    FfiDisabled,
}
