//! Programmable transaction builder.
//!
//! Single-pass state machine: accumulate commands (classifying move-call
//! arguments against the target function's normalized signature), then at
//! build time resolve object inputs in one batch, prepare gas price,
//! payment and budget, and emit the canonical bytes. `build` consumes the
//! builder; a finished transaction can never be amended. One builder
//! instance serves one logical transaction flow; it is not meant to be
//! shared across tasks.

use crate::codec;
use crate::core::errors::{BudgetError, RpcError, ValidationError, WalletError};
use crate::rpc::types::parse_numeric;
use crate::rpc::{self, ChainRpc, MoveNormalizedType, ObjectOwner, SUI_GAS_COIN_TYPE};
use crate::transaction::builder::ProgrammableTransactionBuilder;
use crate::transaction::data::{
    Argument, Command, ProgrammableMoveCall, TransactionData, TransactionKind, GAS_SAFE_OVERHEAD,
    MAX_GAS_OBJECTS, MAX_TX_GAS,
};
use crate::types::{Identifier, ObjectDigest, ObjectId, ObjectRef, SuiAddress, TypeTag};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// A scalar, address or string encoded inline as a pure input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PureValue {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    Address(SuiAddress),
    Str(String),
    Bytes(Vec<u8>),
    Vector(Vec<PureValue>),
}

/// One caller-supplied move-call argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallInput {
    /// Encoded inline after the parameter is classified as pure.
    Pure(PureValue),
    /// An on-chain object, resolved against live state at build time.
    Object(ObjectId),
    /// The result handle of an earlier command.
    Result(Argument),
}

impl CallInput {
    pub fn u64(value: u64) -> Self {
        CallInput::Pure(PureValue::U64(value))
    }

    pub fn address(value: &str) -> Result<Self, ValidationError> {
        Ok(CallInput::Pure(PureValue::Address(SuiAddress::from_hex(value)?)))
    }

    pub fn object(value: &str) -> Result<Self, ValidationError> {
        Ok(CallInput::Object(SuiAddress::from_hex(value)?))
    }
}

/// Source coin for split/merge commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinInput {
    /// The transaction's gas coin.
    Gas,
    /// A coin object resolved at build time.
    Object(ObjectId),
    /// A coin produced by an earlier command.
    Result(Argument),
}

/// Gas parameters; every unset field is prepared during `build`.
#[derive(Debug, Clone, Default)]
pub struct GasConfig {
    pub payment: Vec<ObjectRef>,
    pub owner: Option<SuiAddress>,
    pub price: Option<u64>,
    pub budget: Option<u64>,
}

pub struct TransactionBuilder {
    rpc: Arc<dyn ChainRpc>,
    builder: ProgrammableTransactionBuilder,
    sender: Option<SuiAddress>,
    gas: GasConfig,
}

impl TransactionBuilder {
    pub fn new(rpc: Arc<dyn ChainRpc>) -> Self {
        Self {
            rpc,
            builder: ProgrammableTransactionBuilder::new(),
            sender: None,
            gas: GasConfig::default(),
        }
    }

    pub fn set_sender(&mut self, sender: SuiAddress) {
        self.sender = Some(sender);
    }

    pub fn set_sender_if_not_set(&mut self, sender: SuiAddress) {
        if self.sender.is_none() {
            self.sender = Some(sender);
        }
    }

    pub fn set_gas_price(&mut self, price: u64) {
        self.gas.price = Some(price);
    }

    pub fn set_gas_budget(&mut self, budget: u64) {
        self.gas.budget = Some(budget);
    }

    pub fn set_gas_owner(&mut self, owner: SuiAddress) {
        self.gas.owner = Some(owner);
    }

    pub fn set_gas_payment(&mut self, payment: Vec<ObjectRef>) {
        self.gas.payment = payment;
    }

    /// Add a Move call. Arguments are classified against the function's
    /// normalized parameters; the trailing transaction-context parameter is
    /// implicit and never supplied. Returns one handle per declared return
    /// value, usable by later commands.
    pub async fn move_call(
        &mut self,
        target: &str,
        args: Vec<CallInput>,
        type_args: &[&str],
    ) -> Result<Vec<Argument>, WalletError> {
        let (package, module, function) = parse_target(target)?;
        let normalized = self
            .rpc
            .get_normalized_move_function(package, module.as_str(), function.as_str())
            .await?;

        let mut parameters: &[MoveNormalizedType] = &normalized.parameters;
        if parameters.last().map(is_tx_context).unwrap_or(false) {
            parameters = &parameters[..parameters.len() - 1];
        }
        if parameters.len() != args.len() {
            return Err(ValidationError::ArgumentCount {
                expected: parameters.len(),
                got: args.len(),
            }
            .into());
        }

        let mut arguments = Vec::with_capacity(args.len());
        for (idx, (parameter, input)) in parameters.iter().zip(args.iter()).enumerate() {
            let argument = match input {
                CallInput::Result(arg) => *arg,
                CallInput::Pure(value) => match classify_param(parameter) {
                    ParamClass::Pure => {
                        let bytes = encode_pure(idx, parameter.dereferenced(), value)?;
                        self.builder.pure_bytes(bytes)?
                    }
                    ParamClass::Object { .. } => return Err(mismatch(idx, parameter).into()),
                },
                CallInput::Object(id) => match classify_param(parameter) {
                    ParamClass::Object { mutable } => self.builder.pending_object(*id, mutable)?,
                    ParamClass::Pure => return Err(mismatch(idx, parameter).into()),
                },
            };
            arguments.push(argument);
        }

        let type_arguments = type_args
            .iter()
            .map(|arg| TypeTag::parse(arg))
            .collect::<Result<Vec<_>, _>>()?;

        let command_index = self.builder.command_count() as u16;
        self.builder.command(Command::MoveCall(Box::new(ProgrammableMoveCall {
            package,
            module,
            function,
            type_arguments,
            arguments,
        })));
        debug!(call = target, returns = normalized.return_.len(), "queued move call");
        Ok(self.builder.nested_results(command_index, normalized.return_.len()))
    }

    /// Split amounts off a coin; one result handle per amount.
    pub async fn split_coins(
        &mut self,
        coin: CoinInput,
        amounts: Vec<CallInput>,
    ) -> Result<Vec<Argument>, WalletError> {
        if amounts.is_empty() {
            return Err(ValidationError::ArgumentCount { expected: 1, got: 0 }.into());
        }
        let coin_argument = self.coin_argument(coin)?;
        let mut amount_arguments = Vec::with_capacity(amounts.len());
        for (idx, amount) in amounts.iter().enumerate() {
            let argument = match amount {
                CallInput::Pure(PureValue::U64(value)) => self.builder.pure(value)?,
                CallInput::Result(arg) => *arg,
                _ => {
                    return Err(ValidationError::ArgumentType {
                        index: idx,
                        expected: "U64".to_string(),
                    }
                    .into())
                }
            };
            amount_arguments.push(argument);
        }
        let command_index = self.builder.command_count() as u16;
        self.builder.command(Command::SplitCoins(coin_argument, amount_arguments.clone()));
        Ok(self.builder.nested_results(command_index, amount_arguments.len()))
    }

    /// Merge source coins into a destination coin.
    pub async fn merge_coins(
        &mut self,
        destination: CoinInput,
        sources: Vec<CoinInput>,
    ) -> Result<Argument, WalletError> {
        if sources.is_empty() {
            return Err(ValidationError::ArgumentCount { expected: 1, got: 0 }.into());
        }
        let destination_argument = self.coin_argument(destination)?;
        let source_arguments = sources
            .into_iter()
            .map(|source| self.coin_argument(source))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self
            .builder
            .command(Command::MergeCoins(destination_argument, source_arguments)))
    }

    /// Transfer objects (or earlier results) to a recipient address.
    pub async fn transfer_objects(
        &mut self,
        objects: Vec<CoinInput>,
        recipient: SuiAddress,
    ) -> Result<Argument, WalletError> {
        if objects.is_empty() {
            return Err(ValidationError::ArgumentCount { expected: 1, got: 0 }.into());
        }
        let object_arguments = objects
            .into_iter()
            .map(|object| self.coin_argument(object))
            .collect::<Result<Vec<_>, _>>()?;
        let recipient_argument = self.builder.pure(&recipient)?;
        Ok(self
            .builder
            .command(Command::TransferObjects(object_arguments, recipient_argument)))
    }

    /// Assemble the final transaction and its canonical bytes. Consumes the
    /// builder: all-or-nothing, no partial transaction ever escapes.
    pub async fn build(mut self) -> Result<(TransactionData, Vec<u8>), WalletError> {
        let sender = self.sender.ok_or(ValidationError::MissingSender)?;
        self.resolve_object_inputs().await?;

        let price = match self.gas.price {
            Some(price) => price,
            None => self.rpc.get_reference_gas_price().await? + 1,
        };
        let payment = self.prepare_gas_payment(sender).await?;
        let budget = match self.gas.budget {
            Some(budget) => budget,
            None => self.estimate_gas_budget(sender, price).await?,
        };
        self.assemble(sender, payment, price, budget)
    }

    /// Serialize only the transaction kind (no sender/gas envelope), the
    /// form dev-inspect style simulation endpoints expect.
    pub async fn build_transaction_kind(mut self) -> Result<Vec<u8>, WalletError> {
        self.resolve_object_inputs().await?;
        let kind = TransactionKind::ProgrammableTransaction(self.builder.finish()?);
        Ok(codec::to_bytes(&kind))
    }

    fn coin_argument(&mut self, coin: CoinInput) -> Result<Argument, ValidationError> {
        match coin {
            CoinInput::Gas => Ok(Argument::GasCoin),
            CoinInput::Object(id) => self.builder.pending_object(id, true),
            CoinInput::Result(arg) => Ok(arg),
        }
    }

    /// Batch-fetch every pending object once and classify each by its
    /// current owner: shared objects keep their initial shared version and
    /// the mutability their parameters demanded, owned objects pin the
    /// current version and digest.
    async fn resolve_object_inputs(&mut self) -> Result<(), WalletError> {
        let pending = self.builder.pending_object_ids();
        if pending.is_empty() {
            return Ok(());
        }
        let ids: Vec<ObjectId> = pending.iter().map(|(id, _)| *id).collect();
        let responses = self.rpc.multi_get_objects(&ids).await?;

        let mut by_id = HashMap::new();
        for response in &responses {
            if let Some(data) = &response.data {
                if let Ok(id) = SuiAddress::from_hex(&data.object_id) {
                    by_id.insert(id, data);
                }
            }
        }

        let mut resolved = HashMap::new();
        for (id, mutable) in pending {
            let data = by_id
                .get(&id)
                .ok_or_else(|| ValidationError::ObjectNotFound(id.to_hex()))?;
            let arg = match &data.owner {
                Some(ObjectOwner::Shared { initial_shared_version }) => {
                    crate::transaction::data::ObjectArg::SharedObject {
                        id,
                        initial_shared_version: *initial_shared_version,
                        mutable,
                    }
                }
                _ => crate::transaction::data::ObjectArg::ImmOrOwnedObject(ObjectRef {
                    object_id: id,
                    version: parse_numeric(&data.version)?,
                    digest: ObjectDigest::from_base58(&data.digest)
                        .map_err(|_| RpcError::UnexpectedResponse(format!("bad digest {}", data.digest)))?,
                }),
            };
            resolved.insert(id, arg);
        }
        self.builder.resolve_pending(&resolved)?;
        Ok(())
    }

    /// Gas payment: the owner's gas coins minus every coin already consumed
    /// as an input of this transaction, capped at `MAX_GAS_OBJECTS`.
    async fn prepare_gas_payment(&self, sender: SuiAddress) -> Result<Vec<ObjectRef>, WalletError> {
        if !self.gas.payment.is_empty() {
            if self.gas.payment.len() > MAX_GAS_OBJECTS {
                return Err(ValidationError::TooManyGasObjects(self.gas.payment.len()).into());
            }
            return Ok(self.gas.payment.clone());
        }

        let owner = self.gas.owner.unwrap_or(sender);
        let coins = rpc::get_all_coins(self.rpc.as_ref(), owner, SUI_GAS_COIN_TYPE).await?;

        let mut payment = Vec::new();
        for coin in coins {
            let id = SuiAddress::from_hex(&coin.coin_object_id)?;
            if self.builder.contains_input_object(&id)
                || self.builder.contains_pure_bytes(id.as_bytes())
            {
                continue;
            }
            if payment.len() >= MAX_GAS_OBJECTS {
                break;
            }
            payment.push(ObjectRef {
                object_id: id,
                version: parse_numeric(&coin.version)?,
                digest: ObjectDigest::from_base58(&coin.digest)
                    .map_err(|_| RpcError::UnexpectedResponse(format!("bad digest {}", coin.digest)))?,
            });
        }
        if payment.is_empty() {
            return Err(ValidationError::NoGasCoins.into());
        }
        Ok(payment)
    }

    /// Budget estimation: simulate a provisional transaction carrying the
    /// maximum budget and no payment, then derive
    /// `max(c + overhead, c + overhead + storage - rebate)`.
    async fn estimate_gas_budget(
        &self,
        sender: SuiAddress,
        price: u64,
    ) -> Result<u64, WalletError> {
        let (_, provisional_bytes) = self.assemble(sender, Vec::new(), price, MAX_TX_GAS)?;
        let result = self.rpc.dry_run_transaction_block(&provisional_bytes).await?;
        if !result.effects.status.is_success() {
            return Err(BudgetError::SimulationFailed(
                result.effects.status.error.unwrap_or_else(|| "unknown".to_string()),
            )
            .into());
        }

        let gas_used = &result.effects.gas_used;
        let computation_cost = parse_numeric(&gas_used.computation_cost)?;
        let storage_cost = parse_numeric(&gas_used.storage_cost)?;
        let storage_rebate = parse_numeric(&gas_used.storage_rebate)?;

        let safe_overhead = GAS_SAFE_OVERHEAD * price;
        let base = computation_cost + safe_overhead;
        let with_storage = (base + storage_cost).saturating_sub(storage_rebate);
        Ok(base.max(with_storage))
    }

    fn assemble(
        &self,
        sender: SuiAddress,
        payment: Vec<ObjectRef>,
        price: u64,
        budget: u64,
    ) -> Result<(TransactionData, Vec<u8>), WalletError> {
        let pt = self.builder.finish()?;
        let tx = TransactionData::new_programmable_allow_sponsor(
            sender,
            payment,
            pt,
            budget,
            price,
            self.gas.owner.unwrap_or(sender),
        );
        let bytes = codec::to_bytes(&tx);
        Ok((tx, bytes))
    }
}

fn parse_target(target: &str) -> Result<(ObjectId, Identifier, Identifier), ValidationError> {
    let entry: Vec<&str> = target.split("::").collect();
    if entry.len() != 3 {
        return Err(ValidationError::InvalidTarget(target.to_string()));
    }
    let package = SuiAddress::from_hex(entry[0])
        .map_err(|_| ValidationError::InvalidTarget(target.to_string()))?;
    let module = Identifier::new(entry[1])
        .map_err(|_| ValidationError::InvalidTarget(target.to_string()))?;
    let function = Identifier::new(entry[2])
        .map_err(|_| ValidationError::InvalidTarget(target.to_string()))?;
    Ok((package, module, function))
}

enum ParamClass {
    Pure,
    Object { mutable: bool },
}

fn classify_param(parameter: &MoveNormalizedType) -> ParamClass {
    let mutable = matches!(parameter, MoveNormalizedType::MutableReference(_));
    match parameter.dereferenced() {
        MoveNormalizedType::Bool
        | MoveNormalizedType::U8
        | MoveNormalizedType::U16
        | MoveNormalizedType::U32
        | MoveNormalizedType::U64
        | MoveNormalizedType::U128
        | MoveNormalizedType::U256
        | MoveNormalizedType::Address
        | MoveNormalizedType::Signer
        | MoveNormalizedType::Vector(_) => ParamClass::Pure,
        MoveNormalizedType::Struct { address, module, name, .. }
            if is_string_struct(address, module, name) =>
        {
            ParamClass::Pure
        }
        _ => ParamClass::Object { mutable },
    }
}

fn is_string_struct(address: &str, module: &str, name: &str) -> bool {
    let one = SuiAddress::from_hex("0x1").ok();
    SuiAddress::from_hex(address).ok() == one
        && ((module == "string" && name == "String") || (module == "ascii" && name == "String"))
}

fn is_tx_context(parameter: &MoveNormalizedType) -> bool {
    match parameter.dereferenced() {
        MoveNormalizedType::Struct { address, module, name, .. } => {
            SuiAddress::from_hex(address).ok() == SuiAddress::from_hex("0x2").ok()
                && module == "tx_context"
                && name == "TxContext"
        }
        _ => false,
    }
}

fn mismatch(index: usize, parameter: &MoveNormalizedType) -> ValidationError {
    ValidationError::ArgumentType { index, expected: format!("{:?}", parameter) }
}

fn encode_pure(
    index: usize,
    parameter: &MoveNormalizedType,
    value: &PureValue,
) -> Result<Vec<u8>, ValidationError> {
    match (parameter, value) {
        (MoveNormalizedType::Bool, PureValue::Bool(v)) => Ok(codec::to_bytes(v)),
        (MoveNormalizedType::U8, PureValue::U8(v)) => Ok(codec::to_bytes(v)),
        (MoveNormalizedType::U16, PureValue::U16(v)) => Ok(codec::to_bytes(v)),
        (MoveNormalizedType::U32, PureValue::U32(v)) => Ok(codec::to_bytes(v)),
        (MoveNormalizedType::U64, PureValue::U64(v)) => Ok(codec::to_bytes(v)),
        (MoveNormalizedType::U128, PureValue::U128(v)) => Ok(codec::to_bytes(v)),
        (MoveNormalizedType::Address | MoveNormalizedType::Signer, PureValue::Address(v)) => {
            Ok(codec::to_bytes(v))
        }
        (MoveNormalizedType::Address, PureValue::Str(v)) if v.starts_with("0x") => {
            Ok(codec::to_bytes(&SuiAddress::from_hex(v)?))
        }
        (MoveNormalizedType::Struct { address, module, name, .. }, PureValue::Str(v))
            if is_string_struct(address, module, name) =>
        {
            Ok(codec::to_bytes(v))
        }
        (MoveNormalizedType::Vector(inner), PureValue::Bytes(v))
            if **inner == MoveNormalizedType::U8 =>
        {
            Ok(codec::to_bytes(v))
        }
        (MoveNormalizedType::Vector(inner), PureValue::Str(v))
            if **inner == MoveNormalizedType::U8 =>
        {
            Ok(codec::to_bytes(&v.as_bytes().to_vec()))
        }
        (MoveNormalizedType::Vector(inner), PureValue::Vector(items)) => {
            let mut enc = codec::Encoder::new();
            enc.write_len(items.len());
            let mut out = enc.into_bytes();
            for item in items {
                out.extend_from_slice(&encode_pure(index, inner, item)?);
            }
            Ok(out)
        }
        (parameter, _) => Err(mismatch(index, parameter)),
    }
}
