//! Sui transaction construction and signing toolkit.
//!
//! Stateless, pure-computation core: a canonical BCS codec, Ed25519 /
//! Secp256k1 / Secp256r1 keypairs with mnemonic derivation, intent-framed
//! signing, weighted-threshold multisig, and a programmable transaction
//! builder that resolves inputs against live chain state through a
//! caller-supplied RPC collaborator. The only background activity is the
//! optional per-identity gas refresh task in [`gas`].

pub mod codec;
pub mod core;
pub mod crypto;
pub mod gas;
pub mod rpc;
pub mod signer;
pub mod transaction;
pub mod types;
pub mod utils;

pub use crate::core::errors::{
    BudgetError, CodecError, CryptoError, RpcError, ValidationError, WalletError,
};
pub use crate::core::SdkConfig;
pub use crate::crypto::{MultiSigPublicKey, PublicKey, SignatureScheme, SuiKeyPair};
pub use crate::rpc::ChainRpc;
pub use crate::signer::SuiSigner;
pub use crate::transaction::{CallInput, CoinInput, TransactionBuilder, TransactionData};
pub use crate::types::{ObjectDigest, ObjectId, ObjectRef, SuiAddress};
