//! Error types for typed data hashing
//!
//! All failures are local and synchronous: a returned error means the
//! request itself is malformed and must be corrected by the caller.

use thiserror::Error;

/// Errors that can occur while encoding or hashing typed data
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Eip712Error {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Invalid type: {0}")]
    InvalidType(String),

    #[error("Type {0} is not declared in the type schema")]
    MissingTypeDeclaration(String),

    #[error("No value supplied for field {type_name}.{field}")]
    MissingFieldValue { type_name: String, field: String },

    #[error("Field {type_name}.{field} is declared as a struct but received a non-struct value")]
    StructFieldTypeMismatch { type_name: String, field: String },

    #[error("Array types are not supported: {0}")]
    ArraysUnsupported(String),

    #[error("Type {0} recursively contains itself")]
    RecursiveType(String),

    #[error("Invalid value for type {type_name}: {value}")]
    InvalidValue { type_name: String, value: String },

    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}

/// Result type for typed data operations
pub type Result<T> = std::result::Result<T, Eip712Error>;
