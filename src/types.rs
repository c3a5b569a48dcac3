//! Core data structures for EIP-712 typed data hashing.

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

use ethers_core::types::{I256, U256};

use crate::encoder::classify_field;
use crate::error::{Eip712Error, Result};

/// A field in a struct type declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypedDataField {
    /// The name of the field
    pub name: String,
    /// The type of the field (e.g., "address", "uint256", "Person")
    #[serde(rename = "type")]
    pub type_name: String,
}

impl TypedDataField {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// Type schema: struct name -> ordered field list.
///
/// The field order within a type is significant and part of the encoding;
/// it is never reordered.
pub type Eip712Types = HashMap<String, Vec<TypedDataField>>;

/// A struct value: field name -> value
pub type Eip712Object = HashMap<String, Eip712Value>;

/// A single value in a typed data message.
///
/// Integers are held as 256-bit values so that `uint256`/`int256` payloads
/// survive intact; they are rendered to their canonical decimal form only
/// at the ABI encoding boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Eip712Value {
    Bool(bool),
    Uint(U256),
    Int(I256),
    String(String),
    Bytes(Vec<u8>),
    /// Accepted by the parser, rejected by the encoder (arrays are a
    /// deliberate limitation of this encoder).
    Array(Vec<Eip712Value>),
    Struct(Eip712Object),
}

impl Eip712Value {
    /// Borrow the value as a struct object, if it is one
    pub fn as_struct(&self) -> Option<&Eip712Object> {
        match self {
            Eip712Value::Struct(obj) => Some(obj),
            _ => None,
        }
    }

    /// Short label for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Eip712Value::Bool(_) => "bool",
            Eip712Value::Uint(_) => "uint",
            Eip712Value::Int(_) => "int",
            Eip712Value::String(_) => "string",
            Eip712Value::Bytes(_) => "bytes",
            Eip712Value::Array(_) => "array",
            Eip712Value::Struct(_) => "struct",
        }
    }
}

impl From<bool> for Eip712Value {
    fn from(v: bool) -> Self {
        Eip712Value::Bool(v)
    }
}

impl From<u64> for Eip712Value {
    fn from(v: u64) -> Self {
        Eip712Value::Uint(U256::from(v))
    }
}

impl From<U256> for Eip712Value {
    fn from(v: U256) -> Self {
        Eip712Value::Uint(v)
    }
}

impl From<I256> for Eip712Value {
    fn from(v: I256) -> Self {
        Eip712Value::Int(v)
    }
}

impl From<&str> for Eip712Value {
    fn from(v: &str) -> Self {
        Eip712Value::String(v.to_string())
    }
}

impl From<String> for Eip712Value {
    fn from(v: String) -> Self {
        Eip712Value::String(v)
    }
}

impl From<Eip712Object> for Eip712Value {
    fn from(v: Eip712Object) -> Self {
        Eip712Value::Struct(v)
    }
}

impl<'de> Deserialize<'de> for Eip712Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Eip712Value;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a boolean, integer, string, array, or object")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Eip712Value, E> {
                Ok(Eip712Value::Bool(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Eip712Value, E> {
                Ok(Eip712Value::Uint(U256::from(v)))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Eip712Value, E> {
                if v < 0 {
                    Ok(Eip712Value::Int(I256::from(v)))
                } else {
                    Ok(Eip712Value::Uint(U256::from(v as u64)))
                }
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Eip712Value, E> {
                Err(de::Error::custom(format!(
                    "floating point values are not valid in typed data: {}",
                    v
                )))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Eip712Value, E> {
                Ok(Eip712Value::String(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Eip712Value, E> {
                Ok(Eip712Value::String(v))
            }

            fn visit_seq<A: SeqAccess<'de>>(
                self,
                mut seq: A,
            ) -> std::result::Result<Eip712Value, A::Error> {
                let mut items = Vec::new();
                while let Some(item) = seq.next_element()? {
                    items.push(item);
                }
                Ok(Eip712Value::Array(items))
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Eip712Value, A::Error> {
                let mut object = Eip712Object::new();
                while let Some((key, value)) = map.next_entry::<String, Eip712Value>()? {
                    object.insert(key, value);
                }
                Ok(Eip712Value::Struct(object))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl Serialize for Eip712Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Eip712Value::Bool(v) => serializer.serialize_bool(*v),
            Eip712Value::Uint(v) => {
                if *v <= U256::from(u64::MAX) {
                    serializer.serialize_u64(v.as_u64())
                } else {
                    // Beyond native range: canonical decimal string
                    serializer.serialize_str(&v.to_string())
                }
            }
            Eip712Value::Int(v) => {
                if *v >= I256::from(i64::MIN) && *v <= I256::from(i64::MAX) {
                    serializer.serialize_i64(v.as_i64())
                } else {
                    serializer.serialize_str(&v.to_string())
                }
            }
            Eip712Value::String(v) => serializer.serialize_str(v),
            Eip712Value::Bytes(v) => serializer.serialize_str(&format!("0x{}", hex::encode(v))),
            Eip712Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Eip712Value::Struct(object) => {
                let mut map = serializer.serialize_map(Some(object.len()))?;
                for (key, value) in object {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

/// Complete typed data request, matching the `eth_signTypedData` JSON shape
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedData {
    /// Type definitions (struct name -> fields)
    pub types: Eip712Types,

    /// The name of the primary type being signed
    pub primary_type: String,

    /// The signing domain, shaped as declared by `EIP712Domain` in `types`
    pub domain: Eip712Object,

    /// The actual message data to sign
    pub message: Eip712Object,
}

impl TypedData {
    /// Parse typed data from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Eip712Error::InvalidJson(e.to_string()))
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Eip712Error::InvalidJson(e.to_string()))
    }

    /// Validate the typed data structure
    pub fn validate(&self) -> Result<()> {
        // The primary type must be declared
        if !self.types.contains_key(&self.primary_type) {
            return Err(Eip712Error::MissingTypeDeclaration(self.primary_type.clone()));
        }

        // Every referenced field type must be classifiable
        for fields in self.types.values() {
            for field in fields {
                classify_field(&field.type_name, &self.types)?;
            }
        }

        Ok(())
    }
}
