//! Signature persistence and rule conversion
//!
//! `SignatureStore` owns the on-disk layout (signature and alert
//! directories); `RuleConverter` is the seam for turning a stored
//! signature into a target-specific rule, implemented by
//! `SigmacConverter` shelling out to the external sigmac binary.

pub mod converter;
pub mod store;

pub use converter::{ConvertedRule, RuleConverter, SigmacConverter};
pub use store::SignatureStore;

/// Conversion/persistence result type
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Conversion and persistence error types
#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("converter exited with {status}: {stderr}")]
    ConverterFailed { status: String, stderr: String },

    #[error("converter produced non-UTF-8 output: {0}")]
    InvalidOutput(#[from] std::string::FromUtf8Error),
}
