//! Zero values for typed data types.
//!
//! EIP-712 does not specify zero values; this follows the convention used
//! by signers that need a placeholder payload: atomics encode as the
//! 32-byte zero word, dynamic types as empty content, structs recursively.

use std::collections::HashSet;

use ethers_core::abi::ParamType;
use ethers_core::types::{I256, U256};

use crate::encoder::{classify_field, FieldKind};
use crate::error::{Eip712Error, Result};
use crate::types::{Eip712Object, Eip712Types, Eip712Value};

/// The all-zero Ethereum address
pub const NULL_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Produce the zero value for a given type.
///
/// Dynamic arrays are empty; fixed-length arrays have every member set to
/// zero. Struct fields are zeroed recursively. A struct type that recurs
/// on its own expansion path has no finite zero value and is an error.
pub fn zero_value(type_name: &str, types: &Eip712Types) -> Result<Eip712Value> {
    expand(type_name, types, &mut HashSet::new())
}

fn expand(
    type_name: &str,
    types: &Eip712Types,
    visiting: &mut HashSet<String>,
) -> Result<Eip712Value> {
    match classify_field(type_name, types)? {
        FieldKind::Dynamic => match type_name {
            "string" => Ok(Eip712Value::String(String::new())),
            _ => Ok(Eip712Value::Bytes(Vec::new())),
        },
        FieldKind::Struct(name) => {
            // Guards against cyclic schemas, which terminate in the
            // resolver but cannot be materialized as a value
            if !visiting.insert(name.clone()) {
                return Err(Eip712Error::RecursiveType(name));
            }

            let fields = types
                .get(&name)
                .ok_or_else(|| Eip712Error::MissingTypeDeclaration(name.clone()))?;

            let mut object = Eip712Object::new();
            for field in fields {
                object.insert(field.name.clone(), expand(&field.type_name, types, visiting)?);
            }

            visiting.remove(&name);
            Ok(Eip712Value::Struct(object))
        }
        FieldKind::Array => {
            let (member_type, fixed_length) = split_array_type(type_name)?;
            let mut members = Vec::with_capacity(fixed_length);
            for _ in 0..fixed_length {
                members.push(expand(member_type, types, visiting)?);
            }
            Ok(Eip712Value::Array(members))
        }
        FieldKind::Atomic(param) => match param {
            ParamType::Address => Ok(Eip712Value::String(NULL_ADDRESS.to_string())),
            ParamType::Bool => Ok(Eip712Value::Bool(false)),
            ParamType::Uint(_) => Ok(Eip712Value::Uint(U256::zero())),
            ParamType::Int(_) => Ok(Eip712Value::Int(I256::zero())),
            ParamType::FixedBytes(_) => Ok(Eip712Value::Bytes(Vec::new())),
            _ => Err(Eip712Error::InvalidType(type_name.to_string())),
        },
    }
}

/// Split `T[]` / `T[N]` into the member type and the length (0 when dynamic)
fn split_array_type(type_name: &str) -> Result<(&str, usize)> {
    let open = type_name
        .rfind('[')
        .ok_or_else(|| Eip712Error::InvalidType(type_name.to_string()))?;

    let member_type = &type_name[..open];
    let length_str = &type_name[open + 1..type_name.len() - 1];

    if length_str.is_empty() {
        return Ok((member_type, 0));
    }

    let length: usize = length_str
        .parse()
        .map_err(|_| Eip712Error::InvalidType(type_name.to_string()))?;
    Ok((member_type, length))
}

#[cfg(test)]
mod zero_tests {
    use super::*;
    use crate::types::TypedDataField;

    #[test]
    fn test_atomic_zero_values() {
        let types = Eip712Types::new();

        assert_eq!(
            zero_value("address", &types).unwrap(),
            Eip712Value::String(NULL_ADDRESS.to_string())
        );
        assert_eq!(zero_value("bool", &types).unwrap(), Eip712Value::Bool(false));
        assert_eq!(
            zero_value("uint256", &types).unwrap(),
            Eip712Value::Uint(U256::zero())
        );
        assert_eq!(
            zero_value("string", &types).unwrap(),
            Eip712Value::String(String::new())
        );
        assert_eq!(
            zero_value("bytes32", &types).unwrap(),
            Eip712Value::Bytes(Vec::new())
        );
    }

    #[test]
    fn test_struct_zeroed_recursively() {
        let mut types = Eip712Types::new();
        types.insert(
            "Person".to_string(),
            vec![
                TypedDataField::new("name", "string"),
                TypedDataField::new("wallet", "address"),
            ],
        );
        types.insert(
            "Mail".to_string(),
            vec![
                TypedDataField::new("from", "Person"),
                TypedDataField::new("contents", "string"),
            ],
        );

        let zero = zero_value("Mail", &types).unwrap();
        let object = zero.as_struct().unwrap();
        let from = object["from"].as_struct().unwrap();
        assert_eq!(from["wallet"], Eip712Value::String(NULL_ADDRESS.to_string()));
        assert_eq!(object["contents"], Eip712Value::String(String::new()));
    }

    #[test]
    fn test_array_zero_values() {
        let types = Eip712Types::new();

        assert_eq!(
            zero_value("uint256[]", &types).unwrap(),
            Eip712Value::Array(Vec::new())
        );

        let fixed = zero_value("bool[3]", &types).unwrap();
        assert_eq!(
            fixed,
            Eip712Value::Array(vec![Eip712Value::Bool(false); 3])
        );
    }

    #[test]
    fn test_cyclic_schema_is_an_error() {
        let mut types = Eip712Types::new();
        types.insert(
            "A".to_string(),
            vec![TypedDataField::new("b", "B")],
        );
        types.insert(
            "B".to_string(),
            vec![TypedDataField::new("a", "A")],
        );

        assert_eq!(
            zero_value("A", &types),
            Err(Eip712Error::RecursiveType("A".to_string()))
        );
    }

    #[test]
    fn test_repeated_type_on_sibling_fields_is_not_a_cycle() {
        let mut types = Eip712Types::new();
        types.insert(
            "Person".to_string(),
            vec![TypedDataField::new("wallet", "address")],
        );
        types.insert(
            "Mail".to_string(),
            vec![
                TypedDataField::new("from", "Person"),
                TypedDataField::new("to", "Person"),
            ],
        );

        assert!(zero_value("Mail", &types).is_ok());
    }

    #[test]
    fn test_unknown_type_is_an_error() {
        let types = Eip712Types::new();
        assert!(zero_value("Person", &types).is_err());
    }
}
