pub mod builder;
pub mod data;
pub mod ptb;

pub use self::builder::ProgrammableTransactionBuilder;
pub use self::data::{
    Argument, CallArg, Command, GasData, ObjectArg, ProgrammableMoveCall,
    ProgrammableTransaction, TransactionData, TransactionExpiration, TransactionKind,
    GAS_SAFE_OVERHEAD, MAX_GAS_OBJECTS, MAX_PURE_ARGUMENT_SIZE, MAX_TX_GAS, MAX_TX_SIZE_BYTES,
};
pub use self::ptb::{CallInput, CoinInput, GasConfig, PureValue, TransactionBuilder};
