//! Standalone signature verification.
//!
//! Recovers the signer from a serialized signature and checks it against
//! the reconstructed intent digest, without requiring the caller to hold a
//! `PublicKey` up front.

use crate::core::errors::{CryptoError, WalletError};
use crate::crypto::intent::{self, IntentScope};
use crate::crypto::keypair::{parse_serialized_signature, PublicKey, SignatureScheme};
use crate::types::SuiAddress;
use base64::{engine::general_purpose::STANDARD as B64, Engine as _};

/// Build a [`PublicKey`] from scheme-fixed raw bytes.
pub fn public_key_from_raw_bytes(
    scheme: SignatureScheme,
    bytes: &[u8],
) -> Result<PublicKey, WalletError> {
    Ok(PublicKey::from_raw_bytes(scheme, bytes)?)
}

/// Verify a plain-text personal message signature. Returns the signer
/// address recovered from the embedded public key and the verdict.
pub fn verify_personal_message(
    message: &[u8],
    serialized_signature: &str,
) -> Result<(SuiAddress, bool), WalletError> {
    verify_message(
        &intent::encode_personal_message(message),
        serialized_signature,
        IntentScope::PersonalMessage,
    )
}

/// Verify a signature over base64 canonical transaction bytes.
pub fn verify_transaction_message(
    b64_tx_bytes: &str,
    serialized_signature: &str,
) -> Result<(SuiAddress, bool), WalletError> {
    let tx_bytes = B64
        .decode(b64_tx_bytes)
        .map_err(|e| CryptoError::InvalidSignature(format!("base64 decode: {}", e)))?;
    verify_message(&tx_bytes, serialized_signature, IntentScope::TransactionData)
}

fn verify_message(
    message: &[u8],
    serialized_signature: &str,
    scope: IntentScope,
) -> Result<(SuiAddress, bool), WalletError> {
    let parsed = parse_serialized_signature(serialized_signature)?;
    let public_key = PublicKey::from_raw_bytes(parsed.scheme, &parsed.public_key)?;
    let digest = intent::signing_digest(scope, message);
    let pass = public_key.verify_digest(&digest, &parsed.signature)?;
    Ok((public_key.to_address(), pass))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keypair::SuiKeyPair;

    #[test]
    fn test_verify_personal_message_recovers_signer() {
        let keypair = SuiKeyPair::generate(SignatureScheme::Ed25519).unwrap();
        let signed = keypair.sign_personal_message(b"hello");

        let (signer, pass) = verify_personal_message(b"hello", &signed.signature).unwrap();
        assert!(pass);
        assert_eq!(signer, keypair.to_address());

        let (_, pass) = verify_personal_message(b"hallo", &signed.signature).unwrap();
        assert!(!pass);
    }

    #[test]
    fn test_verify_transaction_message() {
        let keypair = SuiKeyPair::generate(SignatureScheme::Secp256k1).unwrap();
        let tx_b64 = B64.encode(b"not real transaction bytes");
        let signed = keypair.sign_transaction(&tx_b64).unwrap();

        let (signer, pass) = verify_transaction_message(&tx_b64, &signed.signature).unwrap();
        assert!(pass);
        assert_eq!(signer, keypair.to_address());

        // transaction signatures do not verify under the personal-message scope
        let (_, pass) =
            verify_personal_message(b"not real transaction bytes", &signed.signature).unwrap();
        assert!(!pass);
    }

    #[test]
    fn test_public_key_factory() {
        let keypair = SuiKeyPair::generate(SignatureScheme::Secp256r1).unwrap();
        let rebuilt = public_key_from_raw_bytes(
            SignatureScheme::Secp256r1,
            keypair.public_key().raw_bytes(),
        )
        .unwrap();
        assert_eq!(rebuilt, keypair.public_key());
    }
}
