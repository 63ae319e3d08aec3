use thiserror::Error;

/// Canonical binary codec failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Input ended before the schema was fully decoded.
    #[error("unexpected end of input")]
    UnexpectedEof,
    /// Booleans must be exactly 0 or 1 on the wire.
    #[error("invalid boolean byte: {0:#04x}")]
    InvalidBool(u8),
    /// Decoded value left unconsumed bytes behind.
    #[error("trailing bytes after decode: {0}")]
    TrailingBytes(usize),
    /// Length-prefixed string was not valid UTF-8.
    #[error("invalid utf-8 in string")]
    InvalidUtf8,
    /// Sequence length prefix exceeds the supported range.
    #[error("sequence length out of range: {0}")]
    LengthOverflow(u64),
    /// Enum variant index with no schema counterpart.
    #[error("unknown enum variant index: {0}")]
    UnknownVariant(u64),
}

/// Construction-time input validation failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Move call targets must be exactly `package::module::function`.
    #[error("invalid target [{0}]")]
    InvalidTarget(String),
    /// Derivation path does not match the scheme's grammar.
    #[error("invalid derivation path [{0}]")]
    InvalidDerivationPath(String),
    /// Mnemonic failed BIP39 parsing.
    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),
    /// Address / object id hex string is malformed.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    /// Move identifier is malformed.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
    /// Public key bytes have the wrong length for the scheme.
    #[error("invalid public key input, expected {expected} bytes, got {got}")]
    InvalidPublicKey { expected: usize, got: usize },
    /// Private key / seed bytes are unusable.
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),
    /// Move call received the wrong number of arguments.
    #[error("invalid arg length, required: {expected}, but got {got}")]
    ArgumentCount { expected: usize, got: usize },
    /// Supplied argument does not match the classified parameter type.
    #[error("argument {index} does not match parameter type {expected}")]
    ArgumentType { index: usize, expected: String },
    /// Pure argument exceeds the serialized size cap.
    #[error("pure argument too large: {0} bytes")]
    PureArgumentTooLarge(usize),
    /// Multisig member list is empty or too long.
    #[error("max number of signers in a multisig is {max}, got {got}")]
    TooManySigners { max: usize, got: usize },
    /// Every multisig member weight must be positive.
    #[error("signer {0} has zero weight")]
    ZeroWeight(usize),
    /// Same public key registered twice in a multisig.
    #[error("duplicate signer at index {0}")]
    DuplicateSigner(usize),
    /// Threshold can never be met by the combined weights.
    #[error("unreachable threshold {threshold}, total weight {total}")]
    UnreachableThreshold { threshold: u16, total: u16 },
    /// Threshold of zero would authorize anything.
    #[error("threshold must be positive")]
    ZeroThreshold,
    /// Referenced on-chain object does not exist.
    #[error("object not found: {0}")]
    ObjectNotFound(String),
    /// Transaction cannot be built without a sender.
    #[error("missing transaction sender")]
    MissingSender,
    /// No eligible coin left to pay gas with.
    #[error("no valid gas coins found for the transaction")]
    NoGasCoins,
    /// Gas payment list exceeds the protocol cap.
    #[error("payment objects exceed maximum amount: {0}")]
    TooManyGasObjects(usize),
}

/// Signature and key handling failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Signature flag does not match the verifying key's scheme.
    #[error("signature scheme mismatch, expected {expected}, got {got}")]
    SchemeMismatch { expected: String, got: String },
    /// Embedded public key differs from the verifying key.
    #[error("signature does not match public key")]
    PublicKeyMismatch,
    /// Combined signature whose key is not a multisig member.
    #[error("signature {0} does not match any multisig signer")]
    UnmatchedSignature(usize),
    /// Two partial signatures from the same member.
    #[error("duplicate signature for signer {0}")]
    DuplicateSignature(usize),
    /// Matched weights sum below the multisig threshold.
    #[error("combined weight {got} below threshold {required}")]
    ThresholdNotMet { required: u16, got: u16 },
    /// Serialized signature bytes are malformed.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),
    /// Key material could not be parsed.
    #[error("invalid key: {0}")]
    InvalidKey(String),
    /// Flag byte with no known scheme.
    #[error("unsupported signature scheme flag {0:#04x}")]
    UnsupportedScheme(u8),
}

/// Opaque failures propagated from the chain RPC collaborator.
/// This crate never retries them.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("rpc transport error: {0}")]
    Transport(String),
    #[error("unexpected rpc response: {0}")]
    UnexpectedResponse(String),
}

/// Gas budget estimation failures.
#[derive(Debug, Error)]
pub enum BudgetError {
    /// Dry run reported a non-success execution status.
    #[error("dry run failed, could not automatically determine a budget: {0}")]
    SimulationFailed(String),
}

/// Top-level error type for wallet operations.
#[derive(Debug, Error)]
pub enum WalletError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    #[error(transparent)]
    Rpc(#[from] RpcError),
    #[error(transparent)]
    Budget(#[from] BudgetError),
}
