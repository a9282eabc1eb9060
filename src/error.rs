//! Unified error types for the duckweed controller.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! service's error handling uniform.  Policies and the state store are
//! infallible; only configuration, model inference and frame loading can
//! fail.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum Error {
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
    /// The segmentation model failed while running inference.
    Inference(ModelError),
    /// An image could not be read or decoded.
    Frame(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Inference(e) => write!(f, "inference: {e}"),
            Self::Frame(msg) => write!(f, "frame: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// A raw value could not be parsed for the named key.
    Unparsable { key: &'static str, value: String },
    /// The backing file could not be read.
    Io(String),
    /// The backing document is not valid JSON for [`SystemConfig`](crate::config::SystemConfig).
    Corrupted(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
            Self::Unparsable { key, value } => write!(f, "cannot parse {key}={value:?}"),
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
            Self::Corrupted(msg) => write!(f, "config corrupted: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Model errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Weights could not be loaded by the backend.
    LoadFailed(String),
    /// The backend returned an error during a forward pass.
    PredictFailed(String),
    /// A returned mask has a buffer that does not match its dimensions.
    MalformedMask { expected: usize, actual: usize },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoadFailed(msg) => write!(f, "load failed: {msg}"),
            Self::PredictFailed(msg) => write!(f, "predict failed: {msg}"),
            Self::MalformedMask { expected, actual } => {
                write!(f, "mask has {actual} values, expected {expected}")
            }
        }
    }
}

impl std::error::Error for ModelError {}

impl From<ModelError> for Error {
    fn from(e: ModelError) -> Self {
        Self::Inference(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
