//! Optional values encoded in an EIP-712 compatible manner.
//!
//! An `Optional<T>` struct type pairs a `defined` flag with a value, so an
//! absent value still occupies a stable, verifiable slot in the signed
//! payload instead of changing the type string.

use ethers_core::types::U256;

use crate::types::{Eip712Object, Eip712Value, TypedDataField};

/// Declare the `Optional<T>` struct type for a wrapped type name.
///
/// Returns the schema entry to insert into the type table:
/// `Optional<T>(bool defined,T value)`.
pub fn optional_type(type_name: &str) -> (String, Vec<TypedDataField>) {
    (
        format!("Optional<{}>", type_name),
        vec![
            TypedDataField::new("defined", "bool"),
            TypedDataField::new("value", type_name),
        ],
    )
}

/// A present optional value
pub fn some(value: Eip712Value) -> Eip712Value {
    let mut object = Eip712Object::new();
    object.insert("defined".to_string(), Eip712Value::Bool(true));
    object.insert("value".to_string(), value);
    Eip712Value::Struct(object)
}

/// An absent optional boolean
pub fn none_bool() -> Eip712Value {
    absent(Eip712Value::Bool(false))
}

/// An absent optional unsigned integer
pub fn none_uint() -> Eip712Value {
    absent(Eip712Value::Uint(U256::zero()))
}

/// An absent optional string
pub fn none_string() -> Eip712Value {
    absent(Eip712Value::String(String::new()))
}

fn absent(zero: Eip712Value) -> Eip712Value {
    let mut object = Eip712Object::new();
    object.insert("defined".to_string(), Eip712Value::Bool(false));
    object.insert("value".to_string(), zero);
    Eip712Value::Struct(object)
}

#[cfg(test)]
mod optional_tests {
    use super::*;
    use crate::encoder::encode_type;
    use crate::hasher::struct_hash;
    use crate::types::Eip712Types;

    #[test]
    fn test_optional_type_declaration() {
        let (name, fields) = optional_type("uint256");
        assert_eq!(name, "Optional<uint256>");

        let mut types = Eip712Types::new();
        types.insert(name.clone(), fields);
        assert_eq!(
            encode_type(&name, &types).unwrap(),
            "Optional<uint256>(bool defined,uint256 value)"
        );
    }

    #[test]
    fn test_some_and_none_hash_differently() {
        let (name, fields) = optional_type("string");
        let mut types = Eip712Types::new();
        types.insert(name.clone(), fields);

        let present = some(Eip712Value::from(""));
        let absent = none_string();

        let present_hash =
            struct_hash(&name, present.as_struct().unwrap(), &types).unwrap();
        let absent_hash = struct_hash(&name, absent.as_struct().unwrap(), &types).unwrap();
        assert_ne!(present_hash, absent_hash);
    }

    #[test]
    fn test_optional_inside_message() {
        let (opt_name, opt_fields) = optional_type("uint256");
        let mut types = Eip712Types::new();
        types.insert(opt_name, opt_fields);
        types.insert(
            "Claim".to_string(),
            vec![TypedDataField::new("amount", "Optional<uint256>")],
        );

        let mut message = Eip712Object::new();
        message.insert("amount".to_string(), some(Eip712Value::from(42u64)));

        assert!(struct_hash("Claim", &message, &types).is_ok());
    }
}
