//! geomag-testgen: Catch2 test generation for World Magnetic Model C libraries
//!
//! This crate turns reference points published with the World Magnetic Model
//! (geodetic position, decimal year and the local North/East/Down field) into
//! C++ test cases for a header-only field library whose entry point takes an
//! ECEF position in metres and returns the ECEF field in tesla.

use std::path::PathBuf;
use thiserror::Error;

pub mod codegen;
pub mod constants;
pub mod coordinates;
pub mod vectors;

// Re-export commonly used types
pub use codegen::{CheckStyle, Generator};
pub use coordinates::{EcefCase, Geodetic};
pub use vectors::{SuiteOverrides, TestSuite, TestVector, VectorColumns};

/// Main error type for the test generator
#[derive(Debug, Error)]
pub enum TestgenError {
    #[error("I/O error on {path:?}")]
    Io {
        /// The path of the file that caused the error
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    #[error("Malformed test vector JSON")]
    Json(#[from] serde_json::Error),

    /// A parallel input column does not have the same length as `dates`
    #[error("Column '{column}' has {actual} entries, expected {expected}")]
    LengthMismatch {
        column: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid test vector {index}: {reason}")]
    InvalidVector { index: usize, reason: String },

    #[error("Invalid test suite: {0}")]
    InvalidSuite(String),

    #[error("Cannot format non-finite value {0} as a C++ literal")]
    NonFinite(f64),

    #[error("Unexpected float formatting {0:?}")]
    FloatFormat(String),
}

/// Result type for test generator operations
pub type Result<T> = std::result::Result<T, TestgenError>;

/// Helper function to attach a path to a std::io::Error
pub fn io_err(path: impl Into<PathBuf>, err: std::io::Error) -> TestgenError {
    TestgenError::Io {
        path: path.into(),
        source: err,
    }
}
