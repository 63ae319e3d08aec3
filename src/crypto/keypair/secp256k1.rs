//! Secp256k1 keypair: BIP32 derivation, ECDSA over SHA-256 of the signing
//! digest, low-S normalized compact signatures.

use crate::core::errors::{CryptoError, ValidationError, WalletError};
use crate::crypto::derivation::{self, BIP32_CURVE_SEED, HARDENED_OFFSET};
use k256::ecdsa::signature::{Signer as _, Verifier as _};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::elliptic_curve::PrimeField;
use k256::SecretKey;
use zeroize::Zeroizing;

pub const SECP256K1_PUBLIC_KEY_SIZE: usize = 33;
pub const DEFAULT_SECP256K1_DERIVATION_PATH: &str = "m/54'/784'/0'/0/0";

const PURPOSE: u32 = 54;

#[derive(Debug)]
pub struct Secp256k1KeyPair {
    signing: SigningKey,
}

impl Secp256k1KeyPair {
    pub fn generate() -> Self {
        Self { signing: SigningKey::random(&mut rand::rngs::OsRng) }
    }

    pub fn from_seed(seed: &[u8]) -> Result<Self, ValidationError> {
        let secret = SecretKey::from_slice(seed).map_err(|_| {
            ValidationError::InvalidPrivateKey("secp256k1 scalar out of range".to_string())
        })?;
        Ok(Self { signing: SigningKey::from(secret) })
    }

    pub fn derive(mnemonic: &str, path: Option<&str>) -> Result<Self, WalletError> {
        let path = path.unwrap_or(DEFAULT_SECP256K1_DERIVATION_PATH);
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

    pub fn public_key(&self) -> Secp256k1PublicKey {
        let point = self.signing.verifying_key().to_encoded_point(true);
        let mut bytes = [0u8; SECP256K1_PUBLIC_KEY_SIZE];
        bytes.copy_from_slice(point.as_bytes());
        Secp256k1PublicKey(bytes)
    }
}

/// BIP32 over secp256k1: master from HMAC("Bitcoin seed"), children by
/// scalar addition. Out-of-range or zero intermediate keys are rejected
/// instead of retried with the next index.
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
pub struct Secp256k1PublicKey(pub(crate) [u8; SECP256K1_PUBLIC_KEY_SIZE]);

impl Secp256k1PublicKey {
    pub fn new(bytes: &[u8]) -> Result<Self, ValidationError> {
        let arr: [u8; SECP256K1_PUBLIC_KEY_SIZE] =
            bytes.try_into().map_err(|_| ValidationError::InvalidPublicKey {
                expected: SECP256K1_PUBLIC_KEY_SIZE,
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
