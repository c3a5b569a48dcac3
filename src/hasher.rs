//! Struct hashing and digest assembly.
//!
//! Implements `encodeData`, `hashStruct`, and the final
//! `keccak256("\x19\x01" || domainSeparator || hashStruct(message))` digest.

use ethers_core::abi::{self, ParamType, Token};
use ethers_core::types::{Address, I256, U256};

use crate::encoder::{classify_field, keccak256, type_hash, FieldKind};
use crate::error::{Eip712Error, Result};
use crate::types::{Eip712Object, Eip712Types, Eip712Value, TypedData};

/// Magic prefix for EIP-712 encoding (EIP-191 version byte scheme)
const EIP712_PREFIX: &[u8] = b"\x19\x01";

/// Build the ABI-encoded data for a struct value.
///
/// The first slot is always the type hash; each declared field follows, in
/// declaration order, as one further slot. The whole sequence is encoded as
/// an ABI tuple of 32-byte words.
pub fn encode_data(type_name: &str, data: &Eip712Object, types: &Eip712Types) -> Result<Vec<u8>> {
    let fields = types
        .get(type_name)
        .ok_or_else(|| Eip712Error::MissingTypeDeclaration(type_name.to_string()))?;

    let mut tokens = Vec::with_capacity(fields.len() + 1);
    tokens.push(Token::FixedBytes(type_hash(type_name, types)?.to_vec()));

    for field in fields {
        // Every declared field must have a value; absence is an error, not
        // a zero fill.
        let value = data.get(&field.name).ok_or_else(|| Eip712Error::MissingFieldValue {
            type_name: type_name.to_string(),
            field: field.name.clone(),
        })?;

        let token = match classify_field(&field.type_name, types)? {
            FieldKind::Dynamic => {
                let raw = dynamic_bytes(&field.type_name, value)?;
                Token::FixedBytes(keccak256(&raw).to_vec())
            }
            FieldKind::Struct(nested_type) => {
                let nested = value.as_struct().ok_or_else(|| {
                    Eip712Error::StructFieldTypeMismatch {
                        type_name: type_name.to_string(),
                        field: field.name.clone(),
                    }
                })?;
                Token::FixedBytes(struct_hash(&nested_type, nested, types)?.to_vec())
            }
            FieldKind::Array => {
                return Err(Eip712Error::ArraysUnsupported(field.type_name.clone()));
            }
            FieldKind::Atomic(param) => atomic_token(&param, value, &field.type_name)?,
        };
        tokens.push(token);
    }

    Ok(abi::encode(&tokens))
}

/// Hash a struct value.
///
/// hashStruct(s) = keccak256(typeHash || encodeData(s))
pub fn struct_hash(type_name: &str, data: &Eip712Object, types: &Eip712Types) -> Result<[u8; 32]> {
    Ok(keccak256(&encode_data(type_name, data, types)?))
}

/// Calculate the final EIP-712 digest for signing.
///
/// digest = keccak256("\x19\x01" || domainSeparator || hashStruct(message))
pub fn hash_typed_data(typed_data: &TypedData) -> Result<[u8; 32]> {
    typed_data.validate()?;

    let domain_separator = struct_hash("EIP712Domain", &typed_data.domain, &typed_data.types)?;
    let message_hash = struct_hash(
        &typed_data.primary_type,
        &typed_data.message,
        &typed_data.types,
    )?;

    // The outer preimage is exactly 2 + 32 + 32 bytes
    let mut data = Vec::with_capacity(2 + 32 + 32);
    data.extend_from_slice(EIP712_PREFIX);
    data.extend_from_slice(&domain_separator);
    data.extend_from_slice(&message_hash);

    Ok(keccak256(&data))
}

/// The digest components, for signers that need them individually
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eip712PreImage {
    pub domain_separator: [u8; 32],
    pub struct_hash: [u8; 32],
    pub final_hash: [u8; 32],
}

/// Calculate the pre-image components of the digest
pub fn pre_image(typed_data: &TypedData) -> Result<Eip712PreImage> {
    typed_data.validate()?;

    let domain_separator = struct_hash("EIP712Domain", &typed_data.domain, &typed_data.types)?;
    let message_hash = struct_hash(
        &typed_data.primary_type,
        &typed_data.message,
        &typed_data.types,
    )?;

    let mut data = Vec::with_capacity(2 + 32 + 32);
    data.extend_from_slice(EIP712_PREFIX);
    data.extend_from_slice(&domain_separator);
    data.extend_from_slice(&message_hash);
    let final_hash = keccak256(&data);

    Ok(Eip712PreImage {
        domain_separator,
        struct_hash: message_hash,
        final_hash,
    })
}

/// Raw content of a `string` or `bytes` value, before hashing.
///
/// `bytes` accepts either raw bytes, a `0x`-prefixed hex string, or a plain
/// string taken as UTF-8.
fn dynamic_bytes(type_name: &str, value: &Eip712Value) -> Result<Vec<u8>> {
    match (type_name, value) {
        ("string", Eip712Value::String(s)) => Ok(s.as_bytes().to_vec()),
        ("bytes", Eip712Value::Bytes(b)) => Ok(b.clone()),
        ("bytes", Eip712Value::String(s)) => match strip_hex_prefix(s) {
            Some(hex_str) => hex::decode(hex_str).map_err(|e| Eip712Error::InvalidValue {
                type_name: type_name.to_string(),
                value: e.to_string(),
            }),
            None => Ok(s.as_bytes().to_vec()),
        },
        _ => Err(Eip712Error::InvalidValue {
            type_name: type_name.to_string(),
            value: value.kind().to_string(),
        }),
    }
}

/// Encode an atomic value as a single ABI slot token
fn atomic_token(param: &ParamType, value: &Eip712Value, type_name: &str) -> Result<Token> {
    match param {
        ParamType::Address => match value {
            Eip712Value::String(s) => Ok(Token::Address(parse_address(s)?)),
            _ => Err(mismatch(type_name, value)),
        },
        ParamType::Bool => match value {
            Eip712Value::Bool(b) => Ok(Token::Bool(*b)),
            _ => Err(mismatch(type_name, value)),
        },
        ParamType::Uint(_) => Ok(Token::Uint(to_uint(value, type_name)?)),
        ParamType::Int(_) => Ok(Token::Int(to_int(value, type_name)?)),
        ParamType::FixedBytes(size) => {
            let bytes = match value {
                Eip712Value::Bytes(b) => b.clone(),
                Eip712Value::String(s) => match strip_hex_prefix(s) {
                    Some(hex_str) => hex::decode(hex_str).map_err(|_| mismatch(type_name, value))?,
                    None => return Err(mismatch(type_name, value)),
                },
                _ => return Err(mismatch(type_name, value)),
            };
            if bytes.len() > *size {
                return Err(Eip712Error::InvalidValue {
                    type_name: type_name.to_string(),
                    value: format!("{} bytes exceed {}", bytes.len(), size),
                });
            }
            Ok(Token::FixedBytes(bytes))
        }
        _ => Err(Eip712Error::InvalidType(type_name.to_string())),
    }
}

/// Normalize a value to an unsigned 256-bit integer.
///
/// Large integers normalize at this boundary: a `U256` value and its
/// canonical base-10 string form encode identically.
fn to_uint(value: &Eip712Value, type_name: &str) -> Result<U256> {
    match value {
        Eip712Value::Uint(u) => Ok(*u),
        Eip712Value::Int(i) if !i.is_negative() => Ok(i.into_raw()),
        Eip712Value::String(s) => {
            let parsed = match strip_hex_prefix(s) {
                Some(hex_str) => U256::from_str_radix(hex_str, 16).ok(),
                None => U256::from_dec_str(s).ok(),
            };
            parsed.ok_or_else(|| mismatch(type_name, value))
        }
        _ => Err(mismatch(type_name, value)),
    }
}

/// Normalize a value to a signed 256-bit integer in two's complement form
fn to_int(value: &Eip712Value, type_name: &str) -> Result<U256> {
    match value {
        Eip712Value::Int(i) => Ok(i.into_raw()),
        Eip712Value::Uint(u) => {
            if *u > I256::MAX.into_raw() {
                return Err(mismatch(type_name, value));
            }
            Ok(*u)
        }
        Eip712Value::String(s) => {
            let parsed = match strip_hex_prefix(s) {
                Some(hex_str) => U256::from_str_radix(hex_str, 16).ok(),
                None => I256::from_dec_str(s).ok().map(|i| i.into_raw()),
            };
            parsed.ok_or_else(|| mismatch(type_name, value))
        }
        _ => Err(mismatch(type_name, value)),
    }
}

/// Parse a 20-byte Ethereum address from its hex form
fn parse_address(addr: &str) -> Result<Address> {
    let addr = strip_hex_prefix(addr).unwrap_or(addr);

    if addr.len() != 40 {
        return Err(Eip712Error::InvalidAddress(format!(
            "expected 40 hex chars, got {}",
            addr.len()
        )));
    }

    let bytes = hex::decode(addr).map_err(|e| Eip712Error::InvalidAddress(e.to_string()))?;
    let mut raw = [0u8; 20];
    raw.copy_from_slice(&bytes);
    Ok(Address::from(raw))
}

fn strip_hex_prefix(s: &str) -> Option<&str> {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))
}

fn mismatch(type_name: &str, value: &Eip712Value) -> Eip712Error {
    Eip712Error::InvalidValue {
        type_name: type_name.to_string(),
        value: value.kind().to_string(),
    }
}
