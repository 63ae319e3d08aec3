pub mod derivation;
pub mod intent;
pub mod keypair;
pub mod multisig;
pub mod verify;


use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;

/// 256-bit Blake2b, the hash behind every Sui address and signing digest.
pub fn blake2b256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

pub use self::keypair::{
    PublicKey, SignatureScheme, SignaturePubkeyPair, SuiKeyPair,
};
pub use self::multisig::MultiSigPublicKey;
