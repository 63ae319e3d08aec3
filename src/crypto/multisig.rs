//! Weighted-threshold multisig.
//!
//! A multisig account aggregates up to ten member public keys, each with a
//! positive weight, behind a single address. Partial signatures are
//! combined locally into one compact serialized signature; there is no
//! external combine service. All structural invariants are enforced when
//! the key set is constructed, not when signatures are combined.

use crate::codec::{self, Decode, Decoder, Encode, Encoder};
use crate::core::errors::{CodecError, CryptoError, ValidationError, WalletError};
use crate::crypto::blake2b256;
use crate::crypto::keypair::{
    parse_serialized_signature, PublicKey, SignatureScheme, SIGNATURE_SIZE,
};
use crate::types::SuiAddress;
use base64::{engine::general_purpose::STANDARD as B64, Engine as _};
use serde::Serialize;

pub const MAX_SIGNER_IN_MULTISIG: usize = 10;

const MULTISIG_FLAG: u8 = 0x03;

/// An ordered, weighted member set plus its threshold.
///
/// Member order is significant: it fixes bitmap bit positions and the
/// address hash input. Constructed once per identity and reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiSigPublicKey {
    members: Vec<(PublicKey, u8)>,
    threshold: u16,
}

impl MultiSigPublicKey {
    /// Validates every structural invariant up front: member count,
    /// positive weights, no duplicate keys, reachable positive threshold.
    pub fn new(members: Vec<(PublicKey, u8)>, threshold: u16) -> Result<Self, ValidationError> {
        if members.is_empty() || members.len() > MAX_SIGNER_IN_MULTISIG {
            return Err(ValidationError::TooManySigners {
                max: MAX_SIGNER_IN_MULTISIG,
                got: members.len(),
            });
        }
        if threshold == 0 {
            return Err(ValidationError::ZeroThreshold);
        }

        let mut total: u16 = 0;
        for (idx, (key, weight)) in members.iter().enumerate() {
            if *weight == 0 {
                return Err(ValidationError::ZeroWeight(idx));
            }
            if members[..idx].iter().any(|(other, _)| other == key) {
                return Err(ValidationError::DuplicateSigner(idx));
            }
            total += u16::from(*weight);
        }
        if threshold > total {
            return Err(ValidationError::UnreachableThreshold { threshold, total });
        }

        Ok(Self { members, threshold })
    }

    /// Rebuild from the canonical member-map encoding.
    pub fn from_raw_bytes(bytes: &[u8]) -> Result<Self, WalletError> {
        let data: MultiSigPublicKeyData = codec::from_bytes(bytes)?;
        Ok(Self::new(data.pk_map, data.threshold)?)
    }

    pub fn threshold(&self) -> u16 {
        self.threshold
    }

    pub fn members(&self) -> &[(PublicKey, u8)] {
        &self.members
    }

    pub fn flag(&self) -> u8 {
        MULTISIG_FLAG
    }

    /// Canonical encoding of the member map and threshold.
    pub fn raw_bytes(&self) -> Vec<u8> {
        codec::to_bytes(&MultiSigPublicKeyData {
            pk_map: self.members.clone(),
            threshold: self.threshold,
        })
    }

    pub fn to_base64(&self) -> String {
        B64.encode(self.raw_bytes())
    }

    /// Deterministic multisig address:
    /// `blake2b256(0x03 || threshold_le || Σ(flag || raw_pubkey || weight))`.
    pub fn to_address(&self) -> SuiAddress {
        let mut preimage = Vec::new();
        preimage.push(MULTISIG_FLAG);
        preimage.extend_from_slice(&self.threshold.to_le_bytes());
        for (key, weight) in &self.members {
            preimage.extend_from_slice(&key.sui_bytes());
            preimage.push(*weight);
        }
        SuiAddress(blake2b256(&preimage))
    }

    /// Combine partial signatures into one serialized multisig signature.
    ///
    /// Each candidate is matched to a member by its embedded public key
    /// bytes. The bitmap records member indices; compressed signatures are
    /// ordered by member index regardless of input order. Refuses to emit
    /// an artifact whose combined weight cannot authorize anything.
    pub fn combine_partial_signatures(&self, signatures: &[String]) -> Result<String, CryptoError> {
        if signatures.len() > MAX_SIGNER_IN_MULTISIG {
            return Err(CryptoError::InvalidSignature(format!(
                "max number of signatures in a multisig is {}",
                MAX_SIGNER_IN_MULTISIG
            )));
        }

        let mut matched: Vec<Option<CompressedSignature>> = vec![None; self.members.len()];
        for (sig_idx, serialized) in signatures.iter().enumerate() {
            let parsed = parse_serialized_signature(serialized)?;
            let member_idx = self
                .members
                .iter()
                .position(|(key, _)| {
                    key.scheme() == parsed.scheme && key.raw_bytes() == parsed.public_key
                })
                .ok_or(CryptoError::UnmatchedSignature(sig_idx))?;
            if matched[member_idx].is_some() {
                return Err(CryptoError::DuplicateSignature(member_idx));
            }
            let mut bytes = [0u8; SIGNATURE_SIZE];
            bytes.copy_from_slice(&parsed.signature);
            matched[member_idx] = Some(CompressedSignature { flag: parsed.scheme.flag(), bytes });
        }

        let mut bitmap: u16 = 0;
        let mut combined_weight: u16 = 0;
        let mut sigs = Vec::new();
        for (idx, slot) in matched.into_iter().enumerate() {
            if let Some(sig) = slot {
                bitmap |= 1 << idx;
                combined_weight += u16::from(self.members[idx].1);
                sigs.push(sig);
            }
        }

        if combined_weight < self.threshold {
            return Err(CryptoError::ThresholdNotMet {
                required: self.threshold,
                got: combined_weight,
            });
        }

        let payload = MultiSigPayload {
            sigs,
            bitmap,
            multisig_pk: MultiSigPublicKeyData {
                pk_map: self.members.clone(),
                threshold: self.threshold,
            },
        };

        let mut out = Vec::new();
        out.push(MULTISIG_FLAG);
        out.extend_from_slice(&codec::to_bytes(&payload));
        Ok(B64.encode(out))
    }

    /// JSON-serializable description for out-of-band exchange with
    /// co-signers.
    pub fn info(&self) -> MultiSigInfo {
        MultiSigInfo {
            address: self.to_address().to_hex(),
            threshold: self.threshold,
            signers: self
                .members
                .iter()
                .map(|(key, weight)| MultiSigInfoSigner {
                    address: key.to_address().to_hex(),
                    b64_public_key: key.to_base64(),
                    hex_public_key: format!("0x{}", hex::encode(key.raw_bytes())),
                    weight: *weight,
                })
                .collect(),
        }
    }
}

/// Out-of-band multisig description.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MultiSigInfo {
    pub address: String,
    pub threshold: u16,
    pub signers: Vec<MultiSigInfoSigner>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MultiSigInfoSigner {
    pub address: String,
    pub b64_public_key: String,
    pub hex_public_key: String,
    pub weight: u8,
}

// Wire layer. Member keys and compressed signatures are enums on the wire,
// tagged with the scheme flag; their payloads are scheme-fixed arrays.

impl Encode for PublicKey {
    fn encode(&self, enc: &mut Encoder) {
        enc.write_variant(u32::from(self.flag()));
        enc.write_bytes(self.raw_bytes());
    }
}

impl Decode for PublicKey {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, CodecError> {
        let variant = dec.read_variant()?;
        let scheme = SignatureScheme::from_flag(variant as u8)
            .map_err(|_| CodecError::UnknownVariant(variant))?;
        let size = scheme.public_key_size().ok_or(CodecError::UnknownVariant(variant))?;
        let bytes = dec.read_exact(size)?;
        PublicKey::from_raw_bytes(scheme, bytes).map_err(|_| CodecError::UnknownVariant(variant))
    }
}

impl Encode for (PublicKey, u8) {
    fn encode(&self, enc: &mut Encoder) {
        self.0.encode(enc);
        self.1.encode(enc);
    }
}

impl Decode for (PublicKey, u8) {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, CodecError> {
        Ok((PublicKey::decode(dec)?, u8::decode(dec)?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CompressedSignature {
    flag: u8,
    bytes: [u8; SIGNATURE_SIZE],
}

impl Encode for CompressedSignature {
    fn encode(&self, enc: &mut Encoder) {
        enc.write_variant(u32::from(self.flag));
        enc.write_bytes(&self.bytes);
    }
}

impl Decode for CompressedSignature {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, CodecError> {
        let variant = dec.read_variant()?;
        if variant > 2 {
            return Err(CodecError::UnknownVariant(variant));
        }
        Ok(Self { flag: variant as u8, bytes: <[u8; SIGNATURE_SIZE]>::decode(dec)? })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct MultiSigPublicKeyData {
    pk_map: Vec<(PublicKey, u8)>,
    threshold: u16,
}

impl Encode for MultiSigPublicKeyData {
    fn encode(&self, enc: &mut Encoder) {
        self.pk_map.encode(enc);
        self.threshold.encode(enc);
    }
}

impl Decode for MultiSigPublicKeyData {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, CodecError> {
        Ok(Self { pk_map: Vec::decode(dec)?, threshold: u16::decode(dec)? })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct MultiSigPayload {
    sigs: Vec<CompressedSignature>,
    bitmap: u16,
    multisig_pk: MultiSigPublicKeyData,
}

impl Encode for MultiSigPayload {
    fn encode(&self, enc: &mut Encoder) {
        self.sigs.encode(enc);
        self.bitmap.encode(enc);
        self.multisig_pk.encode(enc);
    }
}

impl Decode for MultiSigPayload {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            sigs: Vec::decode(dec)?,
            bitmap: u16::decode(dec)?,
            multisig_pk: MultiSigPublicKeyData::decode(dec)?,
        })
    }
}
