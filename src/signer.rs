//! Signer facade: one identity, ready to sign transactions and messages.

use crate::core::errors::{CryptoError, ValidationError, WalletError};
use crate::crypto::keypair::{SignedData, SignatureScheme, SuiKeyPair};
use crate::crypto::PublicKey;
use crate::types::SuiAddress;
use base64::{engine::general_purpose::STANDARD as B64, Engine as _};
use tracing::info;

pub struct SuiSigner {
    keypair: SuiKeyPair,
}

impl SuiSigner {
    pub fn new(keypair: SuiKeyPair) -> Self {
        let signer = Self { keypair };
        info!(address = %signer.address(), scheme = signer.keypair.scheme().name(), "sui signer ready");
        signer
    }

    /// From a base64 flag-prefixed 33-byte private key.
    pub fn from_base64_private_key(b64: &str) -> Result<Self, WalletError> {
        let bytes = B64
            .decode(b64)
            .map_err(|_| ValidationError::InvalidPrivateKey(format!("unknown base64. {}", b64)))?;
        if bytes.len() != 33 {
            return Err(ValidationError::InvalidPrivateKey(format!("unknown base64. {}", b64)).into());
        }
        let scheme = SignatureScheme::from_flag(bytes[0])?;
        Ok(Self::new(SuiKeyPair::from_seed(scheme, &bytes[1..])?))
    }

    /// From a 0x hex 32-byte Ed25519 seed.
    pub fn from_private_key_hex(private_key: &str) -> Result<Self, WalletError> {
        let raw = private_key.strip_prefix("0x").unwrap_or(private_key);
        let seed = hex::decode(raw).map_err(|e| {
            ValidationError::InvalidPrivateKey(format!("private key decode err {}", e))
        })?;
        Ok(Self::new(SuiKeyPair::from_seed(SignatureScheme::Ed25519, &seed)?))
    }

    /// From a BIP39 mnemonic; defaults to Ed25519 account zero.
    pub fn from_mnemonic(
        mnemonic: &str,
        scheme: SignatureScheme,
        path: Option<&str>,
    ) -> Result<Self, WalletError> {
        Ok(Self::new(SuiKeyPair::derive(scheme, mnemonic, path)?))
    }

    pub fn address(&self) -> SuiAddress {
        self.keypair.to_address()
    }

    pub fn public_key(&self) -> PublicKey {
        self.keypair.public_key()
    }

    pub fn keypair(&self) -> &SuiKeyPair {
        &self.keypair
    }

    /// Sign canonical transaction bytes (base64), ready for submission.
    pub fn sign_transaction(&self, b64_tx_bytes: &str) -> Result<SignedData, CryptoError> {
        self.keypair.sign_transaction(b64_tx_bytes)
    }

    /// Sign a plain-text message under the personal-message scope.
    pub fn sign_personal_message(&self, message: &[u8]) -> SignedData {
        self.keypair.sign_personal_message(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::verify::{verify_personal_message, verify_transaction_message};

    const MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_from_mnemonic_default_path() {
        let signer = SuiSigner::from_mnemonic(MNEMONIC, SignatureScheme::Ed25519, None).unwrap();
        assert_eq!(
            signer.address().to_hex(),
            "0x5e93a736d04fbb25737aa40bee40171ef79f65fae833749e3c089fe7cc2161f1"
        );
    }

    #[test]
    fn test_base64_private_key_round_trip() {
        let original = SuiSigner::from_mnemonic(MNEMONIC, SignatureScheme::Ed25519, None).unwrap();
        let SuiKeyPair::Ed25519(keypair) = original.keypair() else {
            panic!("expected ed25519 keypair");
        };
        let mut prefixed = vec![0u8];
        prefixed.extend_from_slice(&keypair.seed_bytes());
        let restored = SuiSigner::from_base64_private_key(&B64.encode(prefixed)).unwrap();
        assert_eq!(restored.address(), original.address());

        assert!(SuiSigner::from_base64_private_key("c2hvcnQ=").is_err());
    }

    #[test]
    fn test_sign_personal_message() {
        let signer = SuiSigner::from_mnemonic(MNEMONIC, SignatureScheme::Ed25519, None).unwrap();
        let signed = signer.sign_personal_message(b"Hello Go Modules!");
        assert_eq!(signed.bytes, "EUhlbGxvIEdvIE1vZHVsZXMh");
        assert!(signed.signature.starts_with("AGtXLcPTNs1EukLef73WVQ"));

        let (recovered, pass) =
            verify_personal_message(b"Hello Go Modules!", &signed.signature).unwrap();
        assert!(pass);
        assert_eq!(recovered, signer.address());
    }

    #[test]
    fn test_sign_transaction_bytes() {
        let signer = SuiSigner::from_mnemonic(MNEMONIC, SignatureScheme::Ed25519, None).unwrap();
        let tx_b64 = B64.encode([1u8; 40]);
        let signed = signer.sign_transaction(&tx_b64).unwrap();
        assert_eq!(signed.bytes, tx_b64);

        let (recovered, pass) = verify_transaction_message(&tx_b64, &signed.signature).unwrap();
        assert!(pass);
        assert_eq!(recovered, signer.address());

        assert!(signer.sign_transaction("!!bad base64!!").is_err());
    }
}
