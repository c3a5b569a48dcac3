//! EIP712Domain convenience builder.
//!
//! The domain binds a signature to a specific application, contract, and
//! chain. Only the fields that are set participate in the domain type and
//! its hash.

use ethers_core::types::U256;

use crate::types::{Eip712Object, Eip712Value, TypedDataField};

/// The EIP-712 signing domain
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Eip712Domain {
    /// The human-readable name of the signing domain
    pub name: Option<String>,
    /// The current major version of the signing domain
    pub version: Option<String>,
    /// The EIP-155 chain ID
    pub chain_id: Option<U256>,
    /// The address of the contract that will verify the signature
    pub verifying_contract: Option<String>,
    /// An optional disambiguating salt, as a 0x-prefixed 32-byte hex string
    pub salt: Option<String>,
}

impl Eip712Domain {
    /// The `EIP712Domain` field declarations matching the set fields, in
    /// canonical order
    pub fn type_fields(&self) -> Vec<TypedDataField> {
        let mut fields = Vec::new();

        if self.name.is_some() {
            fields.push(TypedDataField::new("name", "string"));
        }
        if self.version.is_some() {
            fields.push(TypedDataField::new("version", "string"));
        }
        if self.chain_id.is_some() {
            fields.push(TypedDataField::new("chainId", "uint256"));
        }
        if self.verifying_contract.is_some() {
            fields.push(TypedDataField::new("verifyingContract", "address"));
        }
        if self.salt.is_some() {
            fields.push(TypedDataField::new("salt", "bytes32"));
        }

        fields
    }

    /// The domain as a struct value accepted by the hasher
    pub fn to_object(&self) -> Eip712Object {
        let mut object = Eip712Object::new();

        if let Some(ref name) = self.name {
            object.insert("name".to_string(), Eip712Value::from(name.clone()));
        }
        if let Some(ref version) = self.version {
            object.insert("version".to_string(), Eip712Value::from(version.clone()));
        }
        if let Some(chain_id) = self.chain_id {
            object.insert("chainId".to_string(), Eip712Value::Uint(chain_id));
        }
        if let Some(ref contract) = self.verifying_contract {
            object.insert(
                "verifyingContract".to_string(),
                Eip712Value::from(contract.clone()),
            );
        }
        if let Some(ref salt) = self.salt {
            object.insert("salt".to_string(), Eip712Value::from(salt.clone()));
        }

        object
    }
}
