//! Polymorphic keypairs and public keys.
//!
//! Three signature schemes behind one tagged-variant surface: Ed25519,
//! Secp256k1 and Secp256r1. Each concrete implementation owns its curve
//! arithmetic; dispatch happens on the scheme tag, and every scheme shares
//! the same capability set: sign, verify, derive address.

pub mod ed25519;
pub mod secp256k1;
pub mod secp256r1;

use crate::core::errors::{CryptoError, ValidationError, WalletError};
use crate::crypto::intent::{self, IntentScope};
use crate::crypto::blake2b256;
use crate::types::SuiAddress;
use base64::{engine::general_purpose::STANDARD as B64, Engine as _};

pub use self::ed25519::{Ed25519KeyPair, Ed25519PublicKey};
pub use self::secp256k1::{Secp256k1KeyPair, Secp256k1PublicKey};
pub use self::secp256r1::{Secp256r1KeyPair, Secp256r1PublicKey};

/// Raw scheme signature length (64-byte compact for every scheme).
pub const SIGNATURE_SIZE: usize = 64;

/// Supported signature schemes, tagged by their wire flag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureScheme {
    Ed25519,
    Secp256k1,
    Secp256r1,
    MultiSig,
}

impl SignatureScheme {
    pub fn flag(&self) -> u8 {
        match self {
            SignatureScheme::Ed25519 => 0x00,
            SignatureScheme::Secp256k1 => 0x01,
            SignatureScheme::Secp256r1 => 0x02,
            SignatureScheme::MultiSig => 0x03,
        }
    }

    pub fn from_flag(flag: u8) -> Result<Self, CryptoError> {
        match flag {
            0x00 => Ok(SignatureScheme::Ed25519),
            0x01 => Ok(SignatureScheme::Secp256k1),
            0x02 => Ok(SignatureScheme::Secp256r1),
            0x03 => Ok(SignatureScheme::MultiSig),
            other => Err(CryptoError::UnsupportedScheme(other)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SignatureScheme::Ed25519 => "ED25519",
            SignatureScheme::Secp256k1 => "Secp256k1",
            SignatureScheme::Secp256r1 => "Secp256r1",
            SignatureScheme::MultiSig => "MultiSig",
        }
    }

    /// Scheme-fixed raw public key length.
    pub fn public_key_size(&self) -> Option<usize> {
        match self {
            SignatureScheme::Ed25519 => Some(32),
            SignatureScheme::Secp256k1 | SignatureScheme::Secp256r1 => Some(33),
            SignatureScheme::MultiSig => None,
        }
    }
}

/// A parsed single-key serialized signature: `flag || signature || pubkey`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignaturePubkeyPair {
    pub scheme: SignatureScheme,
    pub signature: Vec<u8>,
    pub public_key: Vec<u8>,
}

/// `base64(flag || raw_signature || raw_pubkey)`
pub fn to_serialized_signature(scheme: SignatureScheme, signature: &[u8], public_key: &[u8]) -> String {
    let mut bytes = Vec::with_capacity(1 + signature.len() + public_key.len());
    bytes.push(scheme.flag());
    bytes.extend_from_slice(signature);
    bytes.extend_from_slice(public_key);
    B64.encode(bytes)
}

/// Parse a single-key serialized signature. Multisig blobs are rejected
/// here; they decode through [`crate::crypto::multisig`].
pub fn parse_serialized_signature(serialized: &str) -> Result<SignaturePubkeyPair, CryptoError> {
    let bytes = B64
        .decode(serialized)
        .map_err(|e| CryptoError::InvalidSignature(format!("base64 decode: {}", e)))?;
    if bytes.is_empty() {
        return Err(CryptoError::InvalidSignature("empty signature".to_string()));
    }
    let scheme = SignatureScheme::from_flag(bytes[0])?;
    let key_size = scheme
        .public_key_size()
        .ok_or(CryptoError::UnsupportedScheme(bytes[0]))?;
    if bytes.len() != 1 + SIGNATURE_SIZE + key_size {
        return Err(CryptoError::InvalidSignature(format!(
            "expected {} bytes for {}, got {}",
            1 + SIGNATURE_SIZE + key_size,
            scheme.name(),
            bytes.len()
        )));
    }
    Ok(SignaturePubkeyPair {
        scheme,
        signature: bytes[1..1 + SIGNATURE_SIZE].to_vec(),
        public_key: bytes[1 + SIGNATURE_SIZE..].to_vec(),
    })
}

/// A scheme-tagged public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKey {
    Ed25519(Ed25519PublicKey),
    Secp256k1(Secp256k1PublicKey),
    Secp256r1(Secp256r1PublicKey),
}

impl PublicKey {
    /// Construct from scheme-fixed raw bytes; length mismatch is rejected
    /// at construction, never later.
    pub fn from_raw_bytes(scheme: SignatureScheme, bytes: &[u8]) -> Result<Self, ValidationError> {
        match scheme {
            SignatureScheme::Ed25519 => Ok(PublicKey::Ed25519(Ed25519PublicKey::new(bytes)?)),
            SignatureScheme::Secp256k1 => Ok(PublicKey::Secp256k1(Secp256k1PublicKey::new(bytes)?)),
            SignatureScheme::Secp256r1 => Ok(PublicKey::Secp256r1(Secp256r1PublicKey::new(bytes)?)),
            SignatureScheme::MultiSig => Err(ValidationError::InvalidPublicKey {
                expected: 0,
                got: bytes.len(),
            }),
        }
    }

    pub fn scheme(&self) -> SignatureScheme {
        match self {
            PublicKey::Ed25519(_) => SignatureScheme::Ed25519,
            PublicKey::Secp256k1(_) => SignatureScheme::Secp256k1,
            PublicKey::Secp256r1(_) => SignatureScheme::Secp256r1,
        }
    }

    pub fn flag(&self) -> u8 {
        self.scheme().flag()
    }

    pub fn raw_bytes(&self) -> &[u8] {
        match self {
            PublicKey::Ed25519(k) => k.as_bytes(),
            PublicKey::Secp256k1(k) => k.as_bytes(),
            PublicKey::Secp256r1(k) => k.as_bytes(),
        }
    }

    /// `flag || raw_bytes`, the address preimage.
    pub fn sui_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(1 + self.raw_bytes().len());
        bytes.push(self.flag());
        bytes.extend_from_slice(self.raw_bytes());
        bytes
    }

    pub fn to_base64(&self) -> String {
        B64.encode(self.raw_bytes())
    }

    /// Base64 of the flag-prefixed key, the interchange form.
    pub fn to_sui_public_key(&self) -> String {
        B64.encode(self.sui_bytes())
    }

    /// Deterministic one-way address derivation.
    pub fn to_address(&self) -> SuiAddress {
        SuiAddress(blake2b256(&self.sui_bytes()))
    }

    /// Verify a raw 64-byte signature over a 32-byte signing digest.
    pub fn verify_digest(&self, digest: &[u8; 32], signature: &[u8]) -> Result<bool, CryptoError> {
        match self {
            PublicKey::Ed25519(k) => k.verify_digest(digest, signature),
            PublicKey::Secp256k1(k) => k.verify_digest(digest, signature),
            PublicKey::Secp256r1(k) => k.verify_digest(digest, signature),
        }
    }

    /// Verify a serialized signature against an intent-framed message.
    ///
    /// Rejects scheme mismatches and signatures whose embedded public key is
    /// not byte-identical to this key.
    pub fn verify_with_intent(
        &self,
        message: &[u8],
        serialized_signature: &str,
        scope: IntentScope,
    ) -> Result<bool, CryptoError> {
        let parsed = parse_serialized_signature(serialized_signature)?;
        if parsed.scheme != self.scheme() {
            return Err(CryptoError::SchemeMismatch {
                expected: self.scheme().name().to_string(),
                got: parsed.scheme.name().to_string(),
            });
        }
        if parsed.public_key != self.raw_bytes() {
            return Err(CryptoError::PublicKeyMismatch);
        }
        let digest = intent::signing_digest(scope, message);
        self.verify_digest(&digest, &parsed.signature)
    }

    /// Verify a plain-text personal message signature.
    pub fn verify_personal_message(
        &self,
        message: &[u8],
        serialized_signature: &str,
    ) -> Result<bool, CryptoError> {
        self.verify_with_intent(
            &intent::encode_personal_message(message),
            serialized_signature,
            IntentScope::PersonalMessage,
        )
    }

    /// Verify a signature over canonical transaction bytes.
    pub fn verify_transaction_data(
        &self,
        tx_bytes: &[u8],
        serialized_signature: &str,
    ) -> Result<bool, CryptoError> {
        self.verify_with_intent(tx_bytes, serialized_signature, IntentScope::TransactionData)
    }
}

/// Signing output: the base64 payload that was signed plus the serialized
/// signature ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedData {
    pub bytes: String,
    pub signature: String,
}

/// A scheme-tagged keypair. Owns the private scalar; never serialized
/// implicitly, zeroized with its owning scope.
pub enum SuiKeyPair {
    Ed25519(Ed25519KeyPair),
    Secp256k1(Secp256k1KeyPair),
    Secp256r1(Secp256r1KeyPair),
}

impl SuiKeyPair {
    /// Generate a fresh keypair from the OS entropy source.
    pub fn generate(scheme: SignatureScheme) -> Result<Self, WalletError> {
        match scheme {
            SignatureScheme::Ed25519 => Ok(SuiKeyPair::Ed25519(Ed25519KeyPair::generate())),
            SignatureScheme::Secp256k1 => Ok(SuiKeyPair::Secp256k1(Secp256k1KeyPair::generate())),
            SignatureScheme::Secp256r1 => Ok(SuiKeyPair::Secp256r1(Secp256r1KeyPair::generate())),
            SignatureScheme::MultiSig => {
                Err(CryptoError::UnsupportedScheme(SignatureScheme::MultiSig.flag()).into())
            }
        }
    }

    /// Rebuild a keypair from a 32-byte private scalar/seed.
    pub fn from_seed(scheme: SignatureScheme, seed: &[u8]) -> Result<Self, WalletError> {
        match scheme {
            SignatureScheme::Ed25519 => Ok(SuiKeyPair::Ed25519(Ed25519KeyPair::from_seed(seed)?)),
            SignatureScheme::Secp256k1 => {
                Ok(SuiKeyPair::Secp256k1(Secp256k1KeyPair::from_seed(seed)?))
            }
            SignatureScheme::Secp256r1 => {
                Ok(SuiKeyPair::Secp256r1(Secp256r1KeyPair::from_seed(seed)?))
            }
            SignatureScheme::MultiSig => {
                Err(CryptoError::UnsupportedScheme(SignatureScheme::MultiSig.flag()).into())
            }
        }
    }

    /// Derive from a BIP39 mnemonic and a scheme-specific derivation path.
    /// `None` selects the scheme's default account-zero path. The path
    /// grammar is validated before any key material is touched.
    pub fn derive(
        scheme: SignatureScheme,
        mnemonic: &str,
        path: Option<&str>,
    ) -> Result<Self, WalletError> {
        match scheme {
            SignatureScheme::Ed25519 => {
                Ok(SuiKeyPair::Ed25519(Ed25519KeyPair::derive(mnemonic, path)?))
            }
            SignatureScheme::Secp256k1 => {
                Ok(SuiKeyPair::Secp256k1(Secp256k1KeyPair::derive(mnemonic, path)?))
            }
            SignatureScheme::Secp256r1 => {
                Ok(SuiKeyPair::Secp256r1(Secp256r1KeyPair::derive(mnemonic, path)?))
            }
            SignatureScheme::MultiSig => {
                Err(CryptoError::UnsupportedScheme(SignatureScheme::MultiSig.flag()).into())
            }
        }
    }

    pub fn scheme(&self) -> SignatureScheme {
        match self {
            SuiKeyPair::Ed25519(_) => SignatureScheme::Ed25519,
            SuiKeyPair::Secp256k1(_) => SignatureScheme::Secp256k1,
            SuiKeyPair::Secp256r1(_) => SignatureScheme::Secp256r1,
        }
    }

    pub fn public_key(&self) -> PublicKey {
        match self {
            SuiKeyPair::Ed25519(k) => PublicKey::Ed25519(k.public_key()),
            SuiKeyPair::Secp256k1(k) => PublicKey::Secp256k1(k.public_key()),
            SuiKeyPair::Secp256r1(k) => PublicKey::Secp256r1(k.public_key()),
        }
    }

    pub fn to_address(&self) -> SuiAddress {
        self.public_key().to_address()
    }

    /// Raw 64-byte signature over a 32-byte signing digest.
    pub fn sign_digest(&self, digest: &[u8; 32]) -> [u8; SIGNATURE_SIZE] {
        match self {
            SuiKeyPair::Ed25519(k) => k.sign(digest),
            SuiKeyPair::Secp256k1(k) => k.sign(digest),
            SuiKeyPair::Secp256r1(k) => k.sign(digest),
        }
    }

    /// Sign an intent-framed message, returning a serialized signature.
    pub fn sign_with_intent(&self, message: &[u8], scope: IntentScope) -> String {
        let digest = intent::signing_digest(scope, message);
        let signature = self.sign_digest(&digest);
        to_serialized_signature(self.scheme(), &signature, self.public_key().raw_bytes())
    }

    /// Sign a plain-text personal message.
    pub fn sign_personal_message(&self, message: &[u8]) -> SignedData {
        let encoded = intent::encode_personal_message(message);
        let signature = self.sign_with_intent(&encoded, IntentScope::PersonalMessage);
        SignedData { bytes: B64.encode(&encoded), signature }
    }

    /// Sign base64 transaction bytes produced by the transaction builder.
    pub fn sign_transaction(&self, b64_tx_bytes: &str) -> Result<SignedData, CryptoError> {
        let tx_bytes = B64
            .decode(b64_tx_bytes)
            .map_err(|e| CryptoError::InvalidSignature(format!("base64 decode: {}", e)))?;
        let signature = self.sign_with_intent(&tx_bytes, IntentScope::TransactionData);
        Ok(SignedData { bytes: b64_tx_bytes.to_string(), signature })
    }
}
