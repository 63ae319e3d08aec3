//! Hierarchical key derivation.
//!
//! Path grammar validation plus the HMAC-SHA512 machinery shared by the
//! scheme-specific derivations: SLIP-0010 for Ed25519 (hardened-only) and
//! BIP32 for the ECDSA curves. The curve arithmetic for BIP32 child keys
//! lives next to each concrete keypair; this module only owns the parts
//! that are identical across schemes.

use crate::core::errors::{CryptoError, ValidationError};
use hmac::{Hmac, Mac};
use once_cell::sync::Lazy;
use regex::Regex;
use sha2::Sha512;
use zeroize::Zeroizing;

type HmacSha512 = Hmac<Sha512>;

pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// HMAC key for SLIP-0010 Ed25519 master key generation.
pub const ED25519_CURVE_SEED: &[u8] = b"ed25519 seed";
/// HMAC key for BIP32 master key generation (both ECDSA curves).
pub const BIP32_CURVE_SEED: &[u8] = b"Bitcoin seed";

static HARDENED_PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^m/44'/784'/[0-9]+'/[0-9]+'/[0-9]+'$").expect("static regex"));

static BIP32_PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^m/(54|74)'/784'/[0-9]+'/[0-9]+/[0-9]+$").expect("static regex"));

/// Ed25519 paths: `m/44'/784'/a'/b'/c'`, every segment hardened.
pub fn is_valid_hardened_path(path: &str) -> bool {
    HARDENED_PATH_RE.is_match(path)
}

/// ECDSA paths: `m/54'/784'/a'/b/c` (secp256k1) or `m/74'/784'/a'/b/c`
/// (secp256r1), only the first three segments hardened.
pub fn is_valid_bip32_path(path: &str) -> bool {
    BIP32_PATH_RE.is_match(path)
}

/// BIP32 path check pinned to one purpose segment.
pub fn is_valid_bip32_path_with_purpose(path: &str, purpose: u32) -> bool {
    is_valid_bip32_path(path) && path.starts_with(&format!("m/{}'/", purpose))
}

/// Split a validated path into child indices, hardened bit applied.
///
/// Grammar must have been checked first; a malformed segment still fails
/// cleanly rather than panicking.
pub fn parse_path(path: &str) -> Result<Vec<u32>, ValidationError> {
    let mut indices = Vec::new();
    for segment in path.split('/').skip(1) {
        let (raw, hardened) = match segment.strip_suffix('\'') {
            Some(rest) => (rest, true),
            None => (segment, false),
        };
        let index: u32 = raw
            .parse()
            .map_err(|_| ValidationError::InvalidDerivationPath(path.to_string()))?;
        if index >= HARDENED_OFFSET {
            return Err(ValidationError::InvalidDerivationPath(path.to_string()));
        }
        indices.push(if hardened { index | HARDENED_OFFSET } else { index });
    }
    if indices.is_empty() {
        return Err(ValidationError::InvalidDerivationPath(path.to_string()));
    }
    Ok(indices)
}

/// BIP39 mnemonic (empty passphrase) to the 64-byte master seed.
pub fn seed_from_mnemonic(mnemonic: &str) -> Result<Zeroizing<[u8; 64]>, ValidationError> {
    let parsed = bip39::Mnemonic::parse(mnemonic)
        .map_err(|e| ValidationError::InvalidMnemonic(e.to_string()))?;
    Ok(Zeroizing::new(parsed.to_seed("")))
}

/// One HMAC-SHA512 round over concatenated parts.
pub fn hmac_sha512(key: &[u8], parts: &[&[u8]]) -> Result<Zeroizing<[u8; 64]>, CryptoError> {
    let mut mac = HmacSha512::new_from_slice(key)
        .map_err(|e| CryptoError::InvalidKey(format!("hmac init failed: {}", e)))?;
    for part in parts {
        mac.update(part);
    }
    let mut out = Zeroizing::new([0u8; 64]);
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

/// SLIP-0010 Ed25519 derivation. All indices must carry the hardened bit;
/// the curve has no normal-child derivation.
pub fn slip10_ed25519(seed: &[u8], indices: &[u32]) -> Result<Zeroizing<[u8; 32]>, CryptoError> {
    let master = hmac_sha512(ED25519_CURVE_SEED, &[seed])?;
    let mut key = Zeroizing::new([0u8; 32]);
    let mut chain_code = Zeroizing::new([0u8; 32]);
    key.copy_from_slice(&master[..32]);
    chain_code.copy_from_slice(&master[32..]);

    for &index in indices {
        if index < HARDENED_OFFSET {
            return Err(CryptoError::InvalidKey(
                "ed25519 derivation requires hardened indices".to_string(),
            ));
        }
        let i = hmac_sha512(
            chain_code.as_ref(),
            &[&[0u8], key.as_ref(), &index.to_be_bytes()],
        )?;
        key.copy_from_slice(&i[..32]);
        chain_code.copy_from_slice(&i[32..]);
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("m/44'/784'/0'/0'/0'", true; "canonical path")]
    #[test_case("m/44'/784'/123'/456'/789'", true; "large indices")]
    #[test_case("m/44'/784'/0'/0/0'", false; "non-hardened middle segment")]
    #[test_case("m/54'/784'/0'/0'/0'", false; "wrong purpose")]
    #[test_case("m/44'/784'/0'/0'/", false; "missing last segment")]
    #[test_case("m/44/784'/0'/0'/0'", false; "non-hardened purpose")]
    #[test_case("m/44'/785'/0'/0'/0'", false; "wrong coin type")]
    #[test_case("m/44'/784'/0'/0'/0", false; "missing final quote")]
    #[test_case("m/44'/784'/0'/0'/0'/", false; "trailing slash")]
    #[test_case("m/44'/784'/a'/b'/c'", false; "non-numeric indexes")]
    #[test_case("m/44'/784'/0'/0'/0'/extra", false; "extra segment")]
    fn test_hardened_path(path: &str, expected: bool) {
        assert_eq!(is_valid_hardened_path(path), expected);
    }

    #[test_case("m/54'/784'/0'/0/0", true; "secp256k1 path")]
    #[test_case("m/74'/784'/123'/456/789", true; "secp256r1 path large")]
    #[test_case("m/54'/784'/0'/0'/0'", false; "over-hardened")]
    #[test_case("m/44'/784'/0'/0/0", false; "ed25519 purpose")]
    #[test_case("m/54'/784'/0'/0/", false; "missing last segment")]
    #[test_case("m/54/784'/0'/0/0", false; "non-hardened purpose")]
    #[test_case("m/54'/784'/0'/0/0'", false; "hardened final segment")]
    #[test_case("m/54'/784'/0'/0/0/", false; "trailing slash")]
    #[test_case("m/54'/784'/a'/b/c", false; "non-numeric indexes")]
    #[test_case("m/54'/784'/0'/0/0/extra", false; "extra segment")]
    #[test_case("m/74'/784'/0'/0/0", true; "secp256r1 path")]
    fn test_bip32_path(path: &str, expected: bool) {
        assert_eq!(is_valid_bip32_path(path), expected);
    }

    #[test]
    fn test_purpose_pinning() {
        assert!(is_valid_bip32_path_with_purpose("m/54'/784'/0'/0/0", 54));
        assert!(!is_valid_bip32_path_with_purpose("m/74'/784'/0'/0/0", 54));
        assert!(is_valid_bip32_path_with_purpose("m/74'/784'/0'/0/0", 74));
    }

    #[test]
    fn test_parse_path() {
        let indices = parse_path("m/44'/784'/0'/0'/0'").unwrap();
        assert_eq!(
            indices,
            vec![
                44 | HARDENED_OFFSET,
                784 | HARDENED_OFFSET,
                HARDENED_OFFSET,
                HARDENED_OFFSET,
                HARDENED_OFFSET,
            ]
        );

        let indices = parse_path("m/54'/784'/0'/0/5").unwrap();
        assert_eq!(indices[3], 0);
        assert_eq!(indices[4], 5);

        assert!(parse_path("m").is_err());
        assert!(parse_path("m/abc'").is_err());
    }

    #[test]
    fn test_seed_from_mnemonic() {
        let seed = seed_from_mnemonic(
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
        )
        .unwrap();
        // BIP39 reference vector for the all-abandon mnemonic, empty passphrase
        assert_eq!(
            hex::encode(&seed[..8]),
            "5eb00bbddcf06908"
        );

        assert!(seed_from_mnemonic("invalid mnemonic words here").is_err());
    }

    #[test]
    fn test_slip10_rejects_non_hardened() {
        let seed = [1u8; 64];
        let err = slip10_ed25519(&seed, &[44]).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidKey(_)));
    }

    #[test]
    fn test_slip10_is_deterministic() {
        let seed = [1u8; 64];
        let path = [44 | HARDENED_OFFSET, 784 | HARDENED_OFFSET, HARDENED_OFFSET];
        let a = slip10_ed25519(&seed, &path).unwrap();
        let b = slip10_ed25519(&seed, &path).unwrap();
        assert_eq!(a.as_ref(), b.as_ref());

        let other = slip10_ed25519(&seed, &[44 | HARDENED_OFFSET]).unwrap();
        assert_ne!(a.as_ref(), other.as_ref());
    }
}
