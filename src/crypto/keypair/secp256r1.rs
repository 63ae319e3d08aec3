//! Secp256r1 (NIST P-256) keypair. Same BIP32 shape as secp256k1, only the
//! curve and the purpose segment differ.

use crate::core::errors::{CryptoError, ValidationError, WalletError};
use crate::crypto::derivation::{self, BIP32_CURVE_SEED, HARDENED_OFFSET};
use p256::ecdsa::signature::{Signer as _, Verifier as _};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::elliptic_curve::PrimeField;
use p256::SecretKey;
use zeroize::Zeroizing;

pub const SECP256R1_PUBLIC_KEY_SIZE: usize = 33;
pub const DEFAULT_SECP256R1_DERIVATION_PATH: &str = "m/74'/784'/0'/0/0";

const PURPOSE: u32 = 74;

pub struct Secp256r1KeyPair {
    signing: SigningKey,
}

impl Secp256r1KeyPair {
    pub fn generate() -> Self {
        Self { signing: SigningKey::random(&mut rand::rngs::OsRng) }
    }

    pub fn from_seed(seed: &[u8]) -> Result<Self, ValidationError> {
        let secret = SecretKey::from_slice(seed).map_err(|_| {
            ValidationError::InvalidPrivateKey("secp256r1 scalar out of range".to_string())
        })?;
        Ok(Self { signing: SigningKey::from(secret) })
    }

    pub fn derive(mnemonic: &str, path: Option<&str>) -> Result<Self, WalletError> {
        let path = path.unwrap_or(DEFAULT_SECP256R1_DERIVATION_PATH);
        if !derivation::is_valid_bip32_path_with_purpose(path, PURPOSE) {
            return Err(ValidationError::InvalidDerivationPath(path.to_string()).into());
        }
        let seed = derivation::seed_from_mnemonic(mnemonic)?;
        let indices = derivation::parse_path(path)?;
        let key = bip32_derive(seed.as_ref(), &indices)?;
        Ok(Self { signing: SigningKey::from(key) })
    }

    pub fn sign(&self, digest: &[u8; 32]) -> [u8; 64] {
        let signature: Signature = self.signing.sign(digest);
        let signature = signature.normalize_s().unwrap_or(signature);
        let mut out = [0u8; 64];
        out.copy_from_slice(&signature.to_bytes());
        out
    }

    pub fn public_key(&self) -> Secp256r1PublicKey {
        let point = self.signing.verifying_key().to_encoded_point(true);
        let mut bytes = [0u8; SECP256R1_PUBLIC_KEY_SIZE];
        bytes.copy_from_slice(point.as_bytes());
        Secp256r1PublicKey(bytes)
    }
}

fn bip32_derive(seed: &[u8], indices: &[u32]) -> Result<SecretKey, CryptoError> {
    let master = derivation::hmac_sha512(BIP32_CURVE_SEED, &[seed])?;
    let mut key = SecretKey::from_slice(&master[..32])
        .map_err(|_| CryptoError::InvalidKey("master key out of range".to_string()))?;
    let mut chain_code = Zeroizing::new([0u8; 32]);
    chain_code.copy_from_slice(&master[32..]);

    for &index in indices {
        let mut data = Zeroizing::new(Vec::with_capacity(37));
        if index >= HARDENED_OFFSET {
            data.push(0u8);
            data.extend_from_slice(&key.to_bytes());
        } else {
            data.extend_from_slice(key.public_key().to_encoded_point(true).as_bytes());
        }
        data.extend_from_slice(&index.to_be_bytes());

        let i = derivation::hmac_sha512(chain_code.as_ref(), &[&data])?;
        let tweak = SecretKey::from_slice(&i[..32])
            .map_err(|_| CryptoError::InvalidKey("derived tweak out of range".to_string()))?;
        let sum = *tweak.to_nonzero_scalar().as_ref() + *key.to_nonzero_scalar().as_ref();
        key = SecretKey::from_slice(sum.to_repr().as_slice())
            .map_err(|_| CryptoError::InvalidKey("derived zero child key".to_string()))?;
        chain_code.copy_from_slice(&i[32..]);
    }
    Ok(key)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Secp256r1PublicKey(pub(crate) [u8; SECP256R1_PUBLIC_KEY_SIZE]);

impl Secp256r1PublicKey {
    pub fn new(bytes: &[u8]) -> Result<Self, ValidationError> {
        let arr: [u8; SECP256R1_PUBLIC_KEY_SIZE] =
            bytes.try_into().map_err(|_| ValidationError::InvalidPublicKey {
                expected: SECP256R1_PUBLIC_KEY_SIZE,
                got: bytes.len(),
            })?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn verify_digest(&self, digest: &[u8; 32], signature: &[u8]) -> Result<bool, CryptoError> {
        let verifying = VerifyingKey::from_sec1_bytes(&self.0)
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        let parsed = match Signature::from_slice(signature) {
            Ok(sig) => sig,
            Err(_) => return Ok(false),
        };
        let parsed = parsed.normalize_s().unwrap_or(parsed);
        Ok(verifying.verify(digest, &parsed).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_derive_is_deterministic() {
        let a = Secp256r1KeyPair::derive(MNEMONIC, Some("m/74'/784'/0'/0/0")).unwrap();
        let b = Secp256r1KeyPair::derive(MNEMONIC, Some("m/74'/784'/0'/0/0")).unwrap();
        assert_eq!(a.public_key(), b.public_key());
        assert_eq!(a.public_key().as_bytes().len(), SECP256R1_PUBLIC_KEY_SIZE);

        let c = Secp256r1KeyPair::derive(MNEMONIC, Some("m/74'/784'/0'/0/1")).unwrap();
        assert_ne!(a.public_key(), c.public_key());
    }

    #[test]
    fn test_derive_rejects_foreign_purpose() {
        assert!(Secp256r1KeyPair::derive(MNEMONIC, Some("m/54'/784'/0'/0/0")).is_err());
        assert!(Secp256r1KeyPair::derive(MNEMONIC, Some("m/74'/784'/0'/0'/0'")).is_err());
    }

    #[test]
    fn test_sign_verify() {
        let keypair = Secp256r1KeyPair::derive(MNEMONIC, None).unwrap();
        let digest = [9u8; 32];
        let signature = keypair.sign(&digest);
        assert!(keypair.public_key().verify_digest(&digest, &signature).unwrap());
        assert_eq!(signature, keypair.sign(&digest));

        let mut tampered = signature;
        tampered[63] ^= 0x01;
        assert!(!keypair.public_key().verify_digest(&digest, &tampered).unwrap());
    }
}
