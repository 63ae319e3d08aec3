//! Ed25519 keypair: SLIP-0010 hardened-only derivation, signatures over the
//! 32-byte signing digest directly.

use crate::core::errors::{CryptoError, ValidationError, WalletError};
use crate::crypto::derivation;
use ed25519_dalek::{Signature, Signer as _, SigningKey, VerifyingKey};

pub const ED25519_PUBLIC_KEY_SIZE: usize = 32;
pub const DEFAULT_ED25519_DERIVATION_PATH: &str = "m/44'/784'/0'/0'/0'";

#[derive(Clone, Debug)]
pub struct Ed25519KeyPair {
    signing: SigningKey,
}

impl Ed25519KeyPair {
    pub fn generate() -> Self {
        Self { signing: SigningKey::generate(&mut rand::rngs::OsRng) }
    }

    /// Rebuild from a 32-byte seed (the SLIP-0010 leaf key).
    pub fn from_seed(seed: &[u8]) -> Result<Self, ValidationError> {
        let bytes: [u8; 32] = seed.try_into().map_err(|_| {
            ValidationError::InvalidPrivateKey(format!("expected 32 bytes, got {}", seed.len()))
        })?;
        Ok(Self { signing: SigningKey::from_bytes(&bytes) })
    }

    /// Derive from mnemonic and an all-hardened path. Path grammar is
    /// validated before the mnemonic is even parsed.
    pub fn derive(mnemonic: &str, path: Option<&str>) -> Result<Self, WalletError> {
        let path = path.unwrap_or(DEFAULT_ED25519_DERIVATION_PATH);
        if !derivation::is_valid_hardened_path(path) {
            return Err(ValidationError::InvalidDerivationPath(path.to_string()).into());
        }
        let seed = derivation::seed_from_mnemonic(mnemonic)?;
        let indices = derivation::parse_path(path)?;
        let key = derivation::slip10_ed25519(seed.as_ref(), &indices)?;
        Ok(Self::from_seed(key.as_ref())?)
    }

    pub fn sign(&self, digest: &[u8; 32]) -> [u8; 64] {
        self.signing.sign(digest).to_bytes()
    }

    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing.verifying_key().to_bytes())
    }

    /// The private seed bytes. Caller owns the hygiene of the copy.
    pub fn seed_bytes(&self) -> [u8; 32] {
        self.signing.to_bytes()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ed25519PublicKey(pub(crate) [u8; ED25519_PUBLIC_KEY_SIZE]);

impl Ed25519PublicKey {
    pub fn new(bytes: &[u8]) -> Result<Self, ValidationError> {
        let arr: [u8; ED25519_PUBLIC_KEY_SIZE] =
            bytes.try_into().map_err(|_| ValidationError::InvalidPublicKey {
                expected: ED25519_PUBLIC_KEY_SIZE,
                got: bytes.len(),
            })?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn verify_digest(&self, digest: &[u8; 32], signature: &[u8]) -> Result<bool, CryptoError> {
        let verifying = VerifyingKey::from_bytes(&self.0)
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        let sig_bytes: [u8; 64] = signature.try_into().map_err(|_| {
            CryptoError::InvalidSignature(format!("expected 64 bytes, got {}", signature.len()))
        })?;
        Ok(verifying.verify_strict(digest, &Signature::from_bytes(&sig_bytes)).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_derive_matches_known_public_key() {
        let keypair = Ed25519KeyPair::derive(MNEMONIC, Some("m/44'/784'/0'/0'/0'")).unwrap();
        let expected: [u8; 32] = [
            144, 11, 77, 129, 238, 206, 163, 223, 47, 116, 177, 66, 0, 196, 244, 207, 63, 73,
            175, 172, 167, 166, 52, 255, 210, 207, 111, 248, 43, 218, 236, 242,
        ];
        assert_eq!(keypair.public_key().as_bytes(), expected);
    }

    #[test]
    fn test_default_path_is_account_zero() {
        let explicit = Ed25519KeyPair::derive(MNEMONIC, Some(DEFAULT_ED25519_DERIVATION_PATH)).unwrap();
        let implicit = Ed25519KeyPair::derive(MNEMONIC, None).unwrap();
        assert_eq!(explicit.public_key(), implicit.public_key());
    }

    #[test]
    fn test_derive_rejects_bip32_grammar() {
        let err = Ed25519KeyPair::derive(MNEMONIC, Some("m/44'/784'/0'/0/0'")).unwrap_err();
        assert!(matches!(
            err,
            WalletError::Validation(ValidationError::InvalidDerivationPath(_))
        ));
    }

    #[test]
    fn test_sign_verify() {
        let keypair = Ed25519KeyPair::derive(MNEMONIC, None).unwrap();
        let digest = [5u8; 32];
        let signature = keypair.sign(&digest);
        assert!(keypair.public_key().verify_digest(&digest, &signature).unwrap());

        let mut tampered = signature;
        tampered[0] ^= 0x01;
        assert!(!keypair.public_key().verify_digest(&digest, &tampered).unwrap());
    }

    #[test]
    fn test_from_seed_round_trip() {
        let keypair = Ed25519KeyPair::generate();
        let restored = Ed25519KeyPair::from_seed(&keypair.seed_bytes()).unwrap();
        assert_eq!(keypair.public_key(), restored.public_key());
        assert!(Ed25519KeyPair::from_seed(&[0u8; 16]).is_err());
    }
}
