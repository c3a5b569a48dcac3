//! EIP-712 Typed Structured Data Hashing
//!
//! Computes the digest that wallets, remote signers, and on-chain
//! verifiers must agree on bit-for-bit before a signature is accepted:
//!
//! `keccak256("\x19\x01" || domainSeparator || hashStruct(message))`
//!
//! The core is a pure computation: no I/O, no shared state, and every
//! exported operation is safe to call concurrently. Signing the resulting
//! digest is left to an external signer.
//!
//! # Reference
//! - <https://eips.ethereum.org/EIPS/eip-712>
//!
//! # Example
//! ```rust,ignore
//! use sign_typed_data::{hash_typed_data, TypedData};
//!
//! let typed_data = TypedData::from_json(json_string)?;
//! let digest = hash_typed_data(&typed_data)?;
//! ```

pub mod domain;
pub mod encoder;
pub mod error;
pub mod hasher;
pub mod optional;
pub mod resolver;
pub mod types;
pub mod zero;

pub use domain::Eip712Domain;
pub use encoder::{classify_field, encode_type, keccak256, type_hash, FieldKind};
pub use error::{Eip712Error, Result};
pub use hasher::{encode_data, hash_typed_data, pre_image, struct_hash, Eip712PreImage};
pub use resolver::resolve_dependencies;
pub use types::{Eip712Object, Eip712Types, Eip712Value, TypedData, TypedDataField};
pub use zero::{zero_value, NULL_ADDRESS};
