//! Intent framing.
//!
//! Every message is wrapped in a three-byte intent prefix before hashing and
//! signing, so a signature produced for one purpose can never be replayed
//! for another. Personal messages are additionally BCS-framed as a byte
//! vector, keeping plain-text signing disjoint from transaction-byte
//! signing even for identical payloads.

use crate::codec;
use crate::crypto::blake2b256;

const INTENT_VERSION: u8 = 0;
const INTENT_APP_ID: u8 = 0;

/// Domain separation scope for signing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum IntentScope {
    TransactionData = 0,
    PersonalMessage = 3,
}

/// `[scope, version, app_id] || message`
pub fn message_with_intent(scope: IntentScope, message: &[u8]) -> Vec<u8> {
    let mut framed = Vec::with_capacity(3 + message.len());
    framed.push(scope as u8);
    framed.push(INTENT_VERSION);
    framed.push(INTENT_APP_ID);
    framed.extend_from_slice(message);
    framed
}

/// The 32-byte digest that scheme primitives actually sign.
pub fn signing_digest(scope: IntentScope, message: &[u8]) -> [u8; 32] {
    blake2b256(&message_with_intent(scope, message))
}

/// BCS framing applied to personal messages before intent wrapping.
pub fn encode_personal_message(message: &[u8]) -> Vec<u8> {
    codec::to_bytes(&message.to_vec())
}

/// Signing digest for a plain-text message.
pub fn personal_message_digest(message: &[u8]) -> [u8; 32] {
    signing_digest(IntentScope::PersonalMessage, &encode_personal_message(message))
}

/// Signing digest for canonical transaction bytes.
pub fn transaction_digest(tx_bytes: &[u8]) -> [u8; 32] {
    signing_digest(IntentScope::TransactionData, tx_bytes)
}
