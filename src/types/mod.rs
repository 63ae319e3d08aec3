//! On-chain value types shared by the codec, crypto and builder layers.

use crate::codec::{Decode, Decoder, Encode, Encoder};
use crate::core::errors::{CodecError, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte account or object address, displayed as 0x-prefixed hex.
///
/// Derived one-way from public key material; never mutated, always
/// recomputed on demand.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SuiAddress(pub [u8; 32]);

/// Object ids share the address representation.
pub type ObjectId = SuiAddress;

impl SuiAddress {
    pub const LENGTH: usize = 32;
    pub const ZERO: SuiAddress = SuiAddress([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a 0x-prefixed (or bare) hex string. Short strings are
    /// left-padded with zeros, matching fullnode address normalization.
    pub fn from_hex(s: &str) -> Result<Self, ValidationError> {
        let raw = s.strip_prefix("0x").unwrap_or(s);
        if raw.is_empty() || raw.len() > 64 {
            return Err(ValidationError::InvalidAddress(s.to_string()));
        }
        let padded = format!("{:0>64}", raw);
        let bytes =
            hex::decode(&padded).map_err(|_| ValidationError::InvalidAddress(s.to_string()))?;
        let mut out = [0u8; 32];
        out.copy_from_slice(&bytes);
        Ok(Self(out))
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SuiAddress({})", self.to_hex())
    }
}

impl Serialize for SuiAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for SuiAddress {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        SuiAddress::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl Encode for SuiAddress {
    fn encode(&self, enc: &mut Encoder) {
        enc.write_bytes(&self.0);
    }
}

impl Decode for SuiAddress {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, CodecError> {
        Ok(Self(<[u8; 32]>::decode(dec)?))
    }
}

/// A 32-byte object digest, displayed in base58.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectDigest(pub [u8; 32]);

impl ObjectDigest {
    pub fn from_base58(s: &str) -> Result<Self, ValidationError> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|_| ValidationError::InvalidAddress(s.to_string()))?;
        if bytes.len() != 32 {
            return Err(ValidationError::InvalidAddress(s.to_string()));
        }
        let mut out = [0u8; 32];
        out.copy_from_slice(&bytes);
        Ok(Self(out))
    }

    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }
}

impl fmt::Display for ObjectDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl fmt::Debug for ObjectDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectDigest({})", self.to_base58())
    }
}

impl Encode for ObjectDigest {
    fn encode(&self, enc: &mut Encoder) {
        // digests travel as length-prefixed byte sequences on the wire
        enc.write_len(32);
        enc.write_bytes(&self.0);
    }
}

impl Decode for ObjectDigest {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, CodecError> {
        let len = dec.read_len()?;
        if len != 32 {
            return Err(CodecError::LengthOverflow(len as u64));
        }
        Ok(Self(<[u8; 32]>::decode(dec)?))
    }
}

/// Point-in-time reference to an on-chain object. Becomes stale once the
/// object is mutated elsewhere; refreshing is the caller's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectRef {
    pub object_id: ObjectId,
    pub version: u64,
    pub digest: ObjectDigest,
}

impl Encode for ObjectRef {
    fn encode(&self, enc: &mut Encoder) {
        self.object_id.encode(enc);
        self.version.encode(enc);
        self.digest.encode(enc);
    }
}

impl Decode for ObjectRef {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            object_id: ObjectId::decode(dec)?,
            version: u64::decode(dec)?,
            digest: ObjectDigest::decode(dec)?,
        })
    }
}

/// A validated Move identifier (module or function name).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let mut chars = s.chars();
        let valid = match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => false,
        };
        if !valid {
            return Err(ValidationError::InvalidIdentifier(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Encode for Identifier {
    fn encode(&self, enc: &mut Encoder) {
        self.0.encode(enc);
    }
}

impl Decode for Identifier {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, CodecError> {
        Ok(Self(String::decode(dec)?))
    }
}

/// A fully qualified Move struct type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructTag {
    pub address: SuiAddress,
    pub module: Identifier,
    pub name: Identifier,
    pub type_params: Vec<TypeTag>,
}

impl Encode for StructTag {
    fn encode(&self, enc: &mut Encoder) {
        self.address.encode(enc);
        self.module.encode(enc);
        self.name.encode(enc);
        self.type_params.encode(enc);
    }
}

impl Decode for StructTag {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            address: SuiAddress::decode(dec)?,
            module: Identifier::decode(dec)?,
            name: Identifier::decode(dec)?,
            type_params: Vec::<TypeTag>::decode(dec)?,
        })
    }
}

/// Move type tags, wire-compatible with the on-chain enumeration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeTag {
    Bool,
    U8,
    U64,
    U128,
    Address,
    Signer,
    Vector(Box<TypeTag>),
    Struct(Box<StructTag>),
    U16,
    U32,
    U256,
}

impl TypeTag {
    /// Parse a type-argument string: a primitive name, `vector<...>`, or a
    /// `package::module::Name` struct target.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        match s {
            "bool" => return Ok(TypeTag::Bool),
            "u8" => return Ok(TypeTag::U8),
            "u16" => return Ok(TypeTag::U16),
            "u32" => return Ok(TypeTag::U32),
            "u64" => return Ok(TypeTag::U64),
            "u128" => return Ok(TypeTag::U128),
            "u256" => return Ok(TypeTag::U256),
            "address" => return Ok(TypeTag::Address),
            "signer" => return Ok(TypeTag::Signer),
            _ => {}
        }

        if let Some(inner) = s.strip_prefix("vector<").and_then(|rest| rest.strip_suffix('>')) {
            return Ok(TypeTag::Vector(Box::new(TypeTag::parse(inner)?)));
        }

        let entry: Vec<&str> = s.split("::").collect();
        if entry.len() != 3 {
            return Err(ValidationError::InvalidTarget(s.to_string()));
        }
        Ok(TypeTag::Struct(Box::new(StructTag {
            address: SuiAddress::from_hex(entry[0])?,
            module: Identifier::new(entry[1])?,
            name: Identifier::new(entry[2])?,
            type_params: vec![],
        })))
    }
}

impl Encode for TypeTag {
    fn encode(&self, enc: &mut Encoder) {
        match self {
            TypeTag::Bool => enc.write_variant(0),
            TypeTag::U8 => enc.write_variant(1),
            TypeTag::U64 => enc.write_variant(2),
            TypeTag::U128 => enc.write_variant(3),
            TypeTag::Address => enc.write_variant(4),
            TypeTag::Signer => enc.write_variant(5),
            TypeTag::Vector(inner) => {
                enc.write_variant(6);
                inner.encode(enc);
            }
            TypeTag::Struct(tag) => {
                enc.write_variant(7);
                tag.encode(enc);
            }
            TypeTag::U16 => enc.write_variant(8),
            TypeTag::U32 => enc.write_variant(9),
            TypeTag::U256 => enc.write_variant(10),
        }
    }
}

impl Decode for TypeTag {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, CodecError> {
        match dec.read_variant()? {
            0 => Ok(TypeTag::Bool),
            1 => Ok(TypeTag::U8),
            2 => Ok(TypeTag::U64),
            3 => Ok(TypeTag::U128),
            4 => Ok(TypeTag::Address),
            5 => Ok(TypeTag::Signer),
            6 => Ok(TypeTag::Vector(Box::new(TypeTag::decode(dec)?))),
            7 => Ok(TypeTag::Struct(Box::new(StructTag::decode(dec)?))),
            8 => Ok(TypeTag::U16),
            9 => Ok(TypeTag::U32),
            10 => Ok(TypeTag::U256),
            other => Err(CodecError::UnknownVariant(other)),
        }
    }
}
