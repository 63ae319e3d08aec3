//! Key and address encoding helpers shared by callers and tools.

use crate::core::errors::ValidationError;
use crate::crypto::blake2b256;
use crate::types::SuiAddress;
use base64::{engine::general_purpose::STANDARD as B64, Engine as _};

/// Convert a base64 flag-prefixed private key (33 bytes) to 0x hex of the
/// 32-byte seed.
pub fn b64_to_sui_private_key(b64: &str) -> Result<String, ValidationError> {
    let bytes = B64
        .decode(b64)
        .map_err(|_| ValidationError::InvalidPrivateKey(format!("unknown base64. {}", b64)))?;
    if bytes.len() != 33 {
        return Err(ValidationError::InvalidPrivateKey(format!("unknown base64. {}", b64)));
    }
    Ok(format!("0x{}", hex::encode(&bytes[1..])))
}

/// Convert a 0x hex 32-byte seed to the base64 flag-prefixed form
/// (Ed25519 flag).
pub fn sui_private_key_to_b64(private_key: &str) -> Result<String, ValidationError> {
    let raw = private_key
        .strip_prefix("0x")
        .ok_or_else(|| ValidationError::InvalidPrivateKey(format!("unknown private key. {}", private_key)))?;
    if raw.len() != 64 {
        return Err(ValidationError::InvalidPrivateKey(format!(
            "unknown private key. {}",
            private_key
        )));
    }
    let bytes = hex::decode(raw)
        .map_err(|e| ValidationError::InvalidPrivateKey(format!("private key decode err {}", e)))?;
    let mut prefixed = vec![0u8];
    prefixed.extend_from_slice(&bytes);
    Ok(B64.encode(prefixed))
}

/// Address of a base64 flag-prefixed public key.
pub fn b64_public_key_to_address(b64: &str) -> Result<SuiAddress, ValidationError> {
    let bytes = B64
        .decode(b64)
        .map_err(|_| ValidationError::InvalidPublicKey { expected: 33, got: 0 })?;
    Ok(SuiAddress(blake2b256(&bytes)))
}

/// Pad an address to its full 64-hex-digit form.
pub fn normalize_sui_address(address: &str) -> Result<String, ValidationError> {
    Ok(SuiAddress::from_hex(address)?.to_hex())
}

/// Strip leading zeros: `0x000...02` becomes `0x2`.
pub fn normalize_short_address(address: &str) -> Result<String, ValidationError> {
    let full = SuiAddress::from_hex(address)?;
    let trimmed = full.to_hex()[2..].trim_start_matches('0').to_string();
    if trimmed.is_empty() {
        return Ok("0x0".to_string());
    }
    Ok(format!("0x{}", trimmed))
}

/// Shorten the address part of a `package::module::name` coin type.
pub fn normalize_short_coin_type(coin_type: &str) -> Result<String, ValidationError> {
    let parts: Vec<&str> = coin_type.split("::").collect();
    if parts.len() != 3 {
        return Err(ValidationError::InvalidTarget(coin_type.to_string()));
    }
    Ok(format!("{}::{}::{}", normalize_short_address(parts[0])?, parts[1], parts[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_key_b64_hex_round_trip() {
        let hex_key = format!("0x{}", "ab".repeat(32));
        let b64 = sui_private_key_to_b64(&hex_key).unwrap();
        assert_eq!(b64_to_sui_private_key(&b64).unwrap(), hex_key);

        assert!(sui_private_key_to_b64("0x1234").is_err());
        assert!(sui_private_key_to_b64("no-prefix").is_err());
        assert!(b64_to_sui_private_key("dG9vc2hvcnQ=").is_err());
    }

    #[test]
    fn test_b64_public_key_to_address_matches_vector() {
        // flag-prefixed ed25519 key of the reference account
        let address =
            b64_public_key_to_address("AJALTYHuzqPfL3SxQgDE9M8/Sa+sp6Y0/9LPb/gr2uzy").unwrap();
        assert_eq!(
            address.to_hex(),
            "0x5e93a736d04fbb25737aa40bee40171ef79f65fae833749e3c089fe7cc2161f1"
        );
    }

    #[test]
    fn test_address_normalization() {
        assert_eq!(
            normalize_sui_address("0x2").unwrap(),
            "0x0000000000000000000000000000000000000000000000000000000000000002"
        );
        assert_eq!(
            normalize_short_address(
                "0x0000000000000000000000000000000000000000000000000000000000000002"
            )
            .unwrap(),
            "0x2"
        );
        assert_eq!(normalize_short_address("0x0").unwrap(), "0x0");
    }

    #[test]
    fn test_coin_type_normalization() {
        assert_eq!(
            normalize_short_coin_type(
                "0x0000000000000000000000000000000000000000000000000000000000000002::sui::SUI"
            )
            .unwrap(),
            "0x2::sui::SUI"
        );
        assert!(normalize_short_coin_type("0x2::sui").is_err());
    }
}
