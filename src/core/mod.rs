pub mod config;
pub mod errors;

pub use self::config::SdkConfig;
pub use self::errors::{
    BudgetError, CodecError, CryptoError, RpcError, ValidationError, WalletError,
};
