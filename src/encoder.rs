//! Canonical type encoding and field classification.
//!
//! Produces the canonical type string mandated by EIP-712 and resolves each
//! declared field type to the encoding rule it follows.

use ethers_core::abi::ParamType;
use tiny_keccak::{Hasher, Keccak};

use crate::error::{Eip712Error, Result};
use crate::resolver::resolve_dependencies;
use crate::types::{Eip712Types, TypedDataField};

/// Compute keccak256 hash
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut output);
    output
}

/// How a declared field type is encoded, resolved once per field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// `string` or `bytes`: the slot is the keccak hash of the raw content
    Dynamic,
    /// A struct declared in the schema: the slot is its struct hash
    Struct(String),
    /// `T[]` or `T[N]`: deliberately unsupported by this encoder
    Array,
    /// A primitive ABI type encoded directly into a single slot
    Atomic(ParamType),
}

/// Resolve a field type string against the schema.
///
/// Dispatch order matters: `string`/`bytes` win over a schema entry of the
/// same name, a schema entry wins over atomic parsing, and the trailing
/// bracket marks an array whatever its member type is.
pub fn classify_field(type_name: &str, types: &Eip712Types) -> Result<FieldKind> {
    if type_name == "string" || type_name == "bytes" {
        return Ok(FieldKind::Dynamic);
    }
    if types.contains_key(type_name) {
        return Ok(FieldKind::Struct(type_name.to_string()));
    }
    if type_name.ends_with(']') {
        return Ok(FieldKind::Array);
    }
    atomic_param_type(type_name).map(FieldKind::Atomic)
}

/// Parse an atomic ABI type name
fn atomic_param_type(type_name: &str) -> Result<ParamType> {
    if type_name == "address" {
        return Ok(ParamType::Address);
    }
    if type_name == "bool" {
        return Ok(ParamType::Bool);
    }

    // uintN / intN with N a multiple of 8 up to 256
    if let Some(bits) = type_name.strip_prefix("uint") {
        if let Ok(n) = bits.parse::<usize>() {
            if n > 0 && n <= 256 && n % 8 == 0 {
                return Ok(ParamType::Uint(n));
            }
        }
        return Err(Eip712Error::InvalidType(type_name.to_string()));
    }
    if let Some(bits) = type_name.strip_prefix("int") {
        if let Ok(n) = bits.parse::<usize>() {
            if n > 0 && n <= 256 && n % 8 == 0 {
                return Ok(ParamType::Int(n));
            }
        }
        return Err(Eip712Error::InvalidType(type_name.to_string()));
    }

    // bytesN (fixed-size bytes); dynamic `bytes` is handled before this
    if let Some(size) = type_name.strip_prefix("bytes") {
        if let Ok(n) = size.parse::<usize>() {
            if n > 0 && n <= 32 {
                return Ok(ParamType::FixedBytes(n));
            }
        }
    }

    Err(Eip712Error::InvalidType(type_name.to_string()))
}

/// Creates the canonical string encoding of the primary type, including all
/// transitive dependencies.
///
/// The primary type comes first; the remaining dependencies follow in
/// lexicographic order. E.g.
/// `"Mail(Person from,Person to,string contents)Person(string name,address wallet)"`.
pub fn encode_type(primary_type: &str, types: &Eip712Types) -> Result<String> {
    let fields = types
        .get(primary_type)
        .ok_or_else(|| Eip712Error::MissingTypeDeclaration(primary_type.to_string()))?;

    let mut sorted_deps: Vec<String> = resolve_dependencies(primary_type, types)
        .into_iter()
        .filter(|dep| dep != primary_type)
        .collect();
    sorted_deps.sort();

    let mut result = format_type(primary_type, fields);
    for dep in &sorted_deps {
        if let Some(dep_fields) = types.get(dep) {
            result.push_str(&format_type(dep, dep_fields));
        }
    }

    Ok(result)
}

/// Format a single type as `Name(type1 name1,type2 name2,...)`
fn format_type(type_name: &str, fields: &[TypedDataField]) -> String {
    let field_strs: Vec<String> = fields
        .iter()
        .map(|f| format!("{} {}", f.type_name, f.name))
        .collect();

    format!("{}({})", type_name, field_strs.join(","))
}

/// Calculate the type hash for a struct type.
///
/// typeHash = keccak256(encodeType(typeOf(s)))
pub fn type_hash(primary_type: &str, types: &Eip712Types) -> Result<[u8; 32]> {
    let encoded = encode_type(primary_type, types)?;
    Ok(keccak256(encoded.as_bytes()))
}

#[cfg(test)]
mod encoder_tests {
    use super::*;

    fn mail_types() -> Eip712Types {
        let mut types = Eip712Types::new();
        types.insert(
            "Mail".to_string(),
            vec![
                TypedDataField::new("from", "Person"),
                TypedDataField::new("to", "Person"),
                TypedDataField::new("contents", "string"),
            ],
        );
        types.insert(
            "Person".to_string(),
            vec![
                TypedDataField::new("name", "string"),
                TypedDataField::new("wallet", "address"),
            ],
        );
        types
    }

    #[test]
    fn test_encode_type_simple() {
        let encoded = encode_type("Person", &mail_types()).unwrap();
        assert_eq!(encoded, "Person(string name,address wallet)");
    }

    #[test]
    fn test_encode_type_with_dependencies() {
        let encoded = encode_type("Mail", &mail_types()).unwrap();
        assert_eq!(
            encoded,
            "Mail(Person from,Person to,string contents)Person(string name,address wallet)"
        );
    }

    #[test]
    fn test_encode_type_sorts_dependencies() {
        let mut types = Eip712Types::new();
        types.insert(
            "Transaction".to_string(),
            vec![
                TypedDataField::new("from", "Person"),
                TypedDataField::new("tx", "Asset"),
            ],
        );
        types.insert(
            "Person".to_string(),
            vec![TypedDataField::new("wallet", "address")],
        );
        types.insert(
            "Asset".to_string(),
            vec![TypedDataField::new("token", "address")],
        );

        // Person is discovered before Asset, but dependencies sort after
        // the primary type
        let encoded = encode_type("Transaction", &types).unwrap();
        assert_eq!(
            encoded,
            "Transaction(Person from,Asset tx)Asset(address token)Person(address wallet)"
        );
    }

    #[test]
    fn test_encode_type_missing_primary() {
        assert!(matches!(
            encode_type("Missing", &mail_types()),
            Err(Eip712Error::MissingTypeDeclaration(_))
        ));
    }

    #[test]
    fn test_type_hash_matches_encoded_string() {
        let types = mail_types();
        let expected = keccak256(encode_type("Mail", &types).unwrap().as_bytes());
        assert_eq!(type_hash("Mail", &types).unwrap(), expected);
    }

    #[test]
    fn test_classify_dispatch_order() {
        let types = mail_types();

        assert_eq!(classify_field("string", &types).unwrap(), FieldKind::Dynamic);
        assert_eq!(classify_field("bytes", &types).unwrap(), FieldKind::Dynamic);
        assert_eq!(
            classify_field("Person", &types).unwrap(),
            FieldKind::Struct("Person".to_string())
        );
        assert_eq!(classify_field("uint256[]", &types).unwrap(), FieldKind::Array);
        assert_eq!(classify_field("Person[3]", &types).unwrap(), FieldKind::Array);
        assert_eq!(
            classify_field("uint256", &types).unwrap(),
            FieldKind::Atomic(ParamType::Uint(256))
        );
    }

    #[test]
    fn test_classify_atomic_bounds() {
        let types = Eip712Types::new();

        assert_eq!(
            classify_field("address", &types).unwrap(),
            FieldKind::Atomic(ParamType::Address)
        );
        assert_eq!(
            classify_field("bool", &types).unwrap(),
            FieldKind::Atomic(ParamType::Bool)
        );
        assert_eq!(
            classify_field("bytes32", &types).unwrap(),
            FieldKind::Atomic(ParamType::FixedBytes(32))
        );
        assert_eq!(
            classify_field("int8", &types).unwrap(),
            FieldKind::Atomic(ParamType::Int(8))
        );

        assert!(classify_field("uint", &types).is_err());
        assert!(classify_field("uint257", &types).is_err());
        assert!(classify_field("uint12", &types).is_err());
        assert!(classify_field("bytes33", &types).is_err());
        assert!(classify_field("varchar", &types).is_err());
    }

    #[test]
    fn test_keccak256() {
        let hash = keccak256(b"hello");
        assert_eq!(
            hex::encode(hash),
            "1c8aff950685c2ed4bc3174f3472287b56d9517b9c948127319a09a7a36deac8"
        );
    }
}
