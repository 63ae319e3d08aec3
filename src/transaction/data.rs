//! Canonical transaction wire types.
//!
//! These mirror the on-chain BCS layout exactly; the builder assembles
//! them and the codec emits the bytes that get signed and submitted.

use crate::codec::{Decode, Decoder, Encode, Encoder};
use crate::core::errors::CodecError;
use crate::types::{Identifier, ObjectId, ObjectRef, SuiAddress, TypeTag};

pub const MAX_PURE_ARGUMENT_SIZE: usize = 16 * 1024;
pub const MAX_TX_GAS: u64 = 50_000_000_000;
pub const MAX_GAS_OBJECTS: usize = 256;
pub const MAX_TX_SIZE_BYTES: usize = 128 * 1024;
pub const GAS_SAFE_OVERHEAD: u64 = 1000;

/// A command operand. `Result`/`NestedResult` index earlier commands in the
/// arena; the list is strictly forward-referencing, so cycles cannot be
/// expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Argument {
    /// The gas coin of the enclosing transaction.
    GasCoin,
    /// An entry of the shared input table.
    Input(u16),
    /// The whole result of an earlier command.
    Result(u16),
    /// One element of an earlier command's result tuple.
    NestedResult(u16, u16),
}

impl Encode for Argument {
    fn encode(&self, enc: &mut Encoder) {
        match self {
            Argument::GasCoin => enc.write_variant(0),
            Argument::Input(idx) => {
                enc.write_variant(1);
                idx.encode(enc);
            }
            Argument::Result(idx) => {
                enc.write_variant(2);
                idx.encode(enc);
            }
            Argument::NestedResult(idx, sub) => {
                enc.write_variant(3);
                idx.encode(enc);
                sub.encode(enc);
            }
        }
    }
}

impl Decode for Argument {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, CodecError> {
        match dec.read_variant()? {
            0 => Ok(Argument::GasCoin),
            1 => Ok(Argument::Input(u16::decode(dec)?)),
            2 => Ok(Argument::Result(u16::decode(dec)?)),
            3 => Ok(Argument::NestedResult(u16::decode(dec)?, u16::decode(dec)?)),
            other => Err(CodecError::UnknownVariant(other)),
        }
    }
}

/// How an object input is passed: owned (point-in-time reference) or
/// shared (initial version plus mutability).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectArg {
    ImmOrOwnedObject(ObjectRef),
    SharedObject { id: ObjectId, initial_shared_version: u64, mutable: bool },
}

impl ObjectArg {
    pub fn id(&self) -> ObjectId {
        match self {
            ObjectArg::ImmOrOwnedObject(reference) => reference.object_id,
            ObjectArg::SharedObject { id, .. } => *id,
        }
    }
}

impl Encode for ObjectArg {
    fn encode(&self, enc: &mut Encoder) {
        match self {
            ObjectArg::ImmOrOwnedObject(reference) => {
                enc.write_variant(0);
                reference.encode(enc);
            }
            ObjectArg::SharedObject { id, initial_shared_version, mutable } => {
                enc.write_variant(1);
                id.encode(enc);
                initial_shared_version.encode(enc);
                mutable.encode(enc);
            }
        }
    }
}

impl Decode for ObjectArg {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, CodecError> {
        match dec.read_variant()? {
            0 => Ok(ObjectArg::ImmOrOwnedObject(ObjectRef::decode(dec)?)),
            1 => Ok(ObjectArg::SharedObject {
                id: ObjectId::decode(dec)?,
                initial_shared_version: u64::decode(dec)?,
                mutable: bool::decode(dec)?,
            }),
            other => Err(CodecError::UnknownVariant(other)),
        }
    }
}

/// One entry of the transaction input table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArg {
    Pure(Vec<u8>),
    Object(ObjectArg),
}

impl Encode for CallArg {
    fn encode(&self, enc: &mut Encoder) {
        match self {
            CallArg::Pure(bytes) => {
                enc.write_variant(0);
                bytes.encode(enc);
            }
            CallArg::Object(arg) => {
                enc.write_variant(1);
                arg.encode(enc);
            }
        }
    }
}

impl Decode for CallArg {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, CodecError> {
        match dec.read_variant()? {
            0 => Ok(CallArg::Pure(Vec::<u8>::decode(dec)?)),
            1 => Ok(CallArg::Object(ObjectArg::decode(dec)?)),
            other => Err(CodecError::UnknownVariant(other)),
        }
    }
}

/// A Move entry-function invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgrammableMoveCall {
    pub package: ObjectId,
    pub module: Identifier,
    pub function: Identifier,
    pub type_arguments: Vec<TypeTag>,
    pub arguments: Vec<Argument>,
}

impl Encode for ProgrammableMoveCall {
    fn encode(&self, enc: &mut Encoder) {
        self.package.encode(enc);
        self.module.encode(enc);
        self.function.encode(enc);
        self.type_arguments.encode(enc);
        self.arguments.encode(enc);
    }
}

impl Decode for ProgrammableMoveCall {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            package: ObjectId::decode(dec)?,
            module: Identifier::decode(dec)?,
            function: Identifier::decode(dec)?,
            type_arguments: Vec::decode(dec)?,
            arguments: Vec::decode(dec)?,
        })
    }
}

/// One step of a programmable transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MoveCall(Box<ProgrammableMoveCall>),
    TransferObjects(Vec<Argument>, Argument),
    SplitCoins(Argument, Vec<Argument>),
    MergeCoins(Argument, Vec<Argument>),
}

impl Encode for Command {
    fn encode(&self, enc: &mut Encoder) {
        match self {
            Command::MoveCall(call) => {
                enc.write_variant(0);
                call.encode(enc);
            }
            Command::TransferObjects(objects, recipient) => {
                enc.write_variant(1);
                objects.encode(enc);
                recipient.encode(enc);
            }
            Command::SplitCoins(coin, amounts) => {
                enc.write_variant(2);
                coin.encode(enc);
                amounts.encode(enc);
            }
            Command::MergeCoins(destination, sources) => {
                enc.write_variant(3);
                destination.encode(enc);
                sources.encode(enc);
            }
        }
    }
}

impl Decode for Command {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, CodecError> {
        match dec.read_variant()? {
            0 => Ok(Command::MoveCall(Box::new(ProgrammableMoveCall::decode(dec)?))),
            1 => Ok(Command::TransferObjects(Vec::decode(dec)?, Argument::decode(dec)?)),
            2 => Ok(Command::SplitCoins(Argument::decode(dec)?, Vec::decode(dec)?)),
            3 => Ok(Command::MergeCoins(Argument::decode(dec)?, Vec::decode(dec)?)),
            other => Err(CodecError::UnknownVariant(other)),
        }
    }
}

/// The input table plus the forward-referencing command list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgrammableTransaction {
    pub inputs: Vec<CallArg>,
    pub commands: Vec<Command>,
}

impl Encode for ProgrammableTransaction {
    fn encode(&self, enc: &mut Encoder) {
        self.inputs.encode(enc);
        self.commands.encode(enc);
    }
}

impl Decode for ProgrammableTransaction {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, CodecError> {
        Ok(Self { inputs: Vec::decode(dec)?, commands: Vec::decode(dec)? })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionKind {
    ProgrammableTransaction(ProgrammableTransaction),
}

impl Encode for TransactionKind {
    fn encode(&self, enc: &mut Encoder) {
        match self {
            TransactionKind::ProgrammableTransaction(pt) => {
                enc.write_variant(0);
                pt.encode(enc);
            }
        }
    }
}

impl Decode for TransactionKind {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, CodecError> {
        match dec.read_variant()? {
            0 => Ok(TransactionKind::ProgrammableTransaction(ProgrammableTransaction::decode(dec)?)),
            other => Err(CodecError::UnknownVariant(other)),
        }
    }
}

/// Gas payment, owner, price and budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasData {
    pub payment: Vec<ObjectRef>,
    pub owner: SuiAddress,
    pub price: u64,
    pub budget: u64,
}

impl Encode for GasData {
    fn encode(&self, enc: &mut Encoder) {
        self.payment.encode(enc);
        self.owner.encode(enc);
        self.price.encode(enc);
        self.budget.encode(enc);
    }
}

impl Decode for GasData {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            payment: Vec::decode(dec)?,
            owner: SuiAddress::decode(dec)?,
            price: u64::decode(dec)?,
            budget: u64::decode(dec)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionExpiration {
    #[default]
    None,
    Epoch(u64),
}

impl Encode for TransactionExpiration {
    fn encode(&self, enc: &mut Encoder) {
        match self {
            TransactionExpiration::None => enc.write_variant(0),
            TransactionExpiration::Epoch(epoch) => {
                enc.write_variant(1);
                epoch.encode(enc);
            }
        }
    }
}

impl Decode for TransactionExpiration {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, CodecError> {
        match dec.read_variant()? {
            0 => Ok(TransactionExpiration::None),
            1 => Ok(TransactionExpiration::Epoch(u64::decode(dec)?)),
            other => Err(CodecError::UnknownVariant(other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDataV1 {
    pub kind: TransactionKind,
    pub sender: SuiAddress,
    pub gas_data: GasData,
    pub expiration: TransactionExpiration,
}

impl Encode for TransactionDataV1 {
    fn encode(&self, enc: &mut Encoder) {
        self.kind.encode(enc);
        self.sender.encode(enc);
        self.gas_data.encode(enc);
        self.expiration.encode(enc);
    }
}

impl Decode for TransactionDataV1 {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            kind: TransactionKind::decode(dec)?,
            sender: SuiAddress::decode(dec)?,
            gas_data: GasData::decode(dec)?,
            expiration: TransactionExpiration::decode(dec)?,
        })
    }
}

/// The signable transaction envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionData {
    V1(TransactionDataV1),
}

impl TransactionData {
    pub fn new_programmable(
        sender: SuiAddress,
        gas_payment: Vec<ObjectRef>,
        pt: ProgrammableTransaction,
        gas_budget: u64,
        gas_price: u64,
    ) -> Self {
        Self::new_programmable_allow_sponsor(sender, gas_payment, pt, gas_budget, gas_price, sender)
    }

    pub fn new_programmable_allow_sponsor(
        sender: SuiAddress,
        gas_payment: Vec<ObjectRef>,
        pt: ProgrammableTransaction,
        gas_budget: u64,
        gas_price: u64,
        gas_owner: SuiAddress,
    ) -> Self {
        TransactionData::V1(TransactionDataV1 {
            kind: TransactionKind::ProgrammableTransaction(pt),
            sender,
            gas_data: GasData {
                payment: gas_payment,
                owner: gas_owner,
                price: gas_price,
                budget: gas_budget,
            },
            expiration: TransactionExpiration::None,
        })
    }

    pub fn sender(&self) -> SuiAddress {
        match self {
            TransactionData::V1(v1) => v1.sender,
        }
    }

    pub fn gas_data(&self) -> &GasData {
        match self {
            TransactionData::V1(v1) => &v1.gas_data,
        }
    }
}

impl Encode for TransactionData {
    fn encode(&self, enc: &mut Encoder) {
        match self {
            TransactionData::V1(v1) => {
                enc.write_variant(0);
                v1.encode(enc);
            }
        }
    }
}

impl Decode for TransactionData {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, CodecError> {
        match dec.read_variant()? {
            0 => Ok(TransactionData::V1(TransactionDataV1::decode(dec)?)),
            other => Err(CodecError::UnknownVariant(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{from_bytes, to_bytes};
    use crate::types::ObjectDigest;

    fn sample_ref(seed: u8) -> ObjectRef {
        ObjectRef {
            object_id: SuiAddress([seed; 32]),
            version: u64::from(seed),
            digest: ObjectDigest([seed.wrapping_add(1); 32]),
        }
    }

    fn sample_transaction() -> TransactionData {
        let pt = ProgrammableTransaction {
            inputs: vec![
                CallArg::Pure(to_bytes(&7u64)),
                CallArg::Object(ObjectArg::ImmOrOwnedObject(sample_ref(3))),
                CallArg::Object(ObjectArg::SharedObject {
                    id: SuiAddress([9; 32]),
                    initial_shared_version: 4,
                    mutable: true,
                }),
            ],
            commands: vec![
                Command::SplitCoins(Argument::GasCoin, vec![Argument::Input(0)]),
                Command::MoveCall(Box::new(ProgrammableMoveCall {
                    package: SuiAddress::from_hex("0x2").unwrap(),
                    module: Identifier::new("coin").unwrap(),
                    function: Identifier::new("join").unwrap(),
                    type_arguments: vec![TypeTag::parse("0x2::sui::SUI").unwrap()],
                    arguments: vec![Argument::Input(1), Argument::NestedResult(0, 0)],
                })),
                Command::MergeCoins(Argument::Input(1), vec![Argument::Input(2)]),
                Command::TransferObjects(vec![Argument::Result(1)], Argument::Input(0)),
            ],
        };
        TransactionData::new_programmable(
            SuiAddress([1; 32]),
            vec![sample_ref(5)],
            pt,
            2_000_000,
            1001,
        )
    }

    #[test]
    fn test_argument_wire_layout() {
        assert_eq!(to_bytes(&Argument::GasCoin), vec![0]);
        assert_eq!(to_bytes(&Argument::Input(3)), vec![1, 3, 0]);
        assert_eq!(to_bytes(&Argument::Result(1)), vec![2, 1, 0]);
        assert_eq!(to_bytes(&Argument::NestedResult(1, 2)), vec![3, 1, 0, 2, 0]);
    }

    #[test]
    fn test_argument_round_trip() {
        for argument in [
            Argument::GasCoin,
            Argument::Input(u16::MAX),
            Argument::Result(0),
            Argument::NestedResult(7, 3),
        ] {
            let bytes = to_bytes(&argument);
            assert_eq!(from_bytes::<Argument>(&bytes).unwrap(), argument);
        }
        assert!(from_bytes::<Argument>(&[4]).is_err());
    }

    #[test]
    fn test_call_arg_round_trip() {
        let args = vec![
            CallArg::Pure(vec![1, 2, 3]),
            CallArg::Object(ObjectArg::ImmOrOwnedObject(sample_ref(1))),
            CallArg::Object(ObjectArg::SharedObject {
                id: SuiAddress([2; 32]),
                initial_shared_version: 99,
                mutable: false,
            }),
        ];
        let bytes = to_bytes(&args);
        assert_eq!(from_bytes::<Vec<CallArg>>(&bytes).unwrap(), args);
    }

    #[test]
    fn test_transaction_data_round_trip() {
        let tx = sample_transaction();
        let bytes = to_bytes(&tx);
        assert_eq!(from_bytes::<TransactionData>(&bytes).unwrap(), tx);
        // envelope version tag leads the encoding
        assert_eq!(bytes[0], 0);
    }

    #[test]
    fn test_transaction_kind_round_trip() {
        let TransactionData::V1(v1) = sample_transaction();
        let kind = v1.kind;
        let bytes = to_bytes(&kind);
        assert_eq!(bytes[0], 0);
        assert_eq!(from_bytes::<TransactionKind>(&bytes).unwrap(), kind);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        assert_eq!(to_bytes(&sample_transaction()), to_bytes(&sample_transaction()));
    }

    #[test]
    fn test_gas_owner_may_differ_from_sender() {
        let sponsor = SuiAddress([8; 32]);
        let tx = TransactionData::new_programmable_allow_sponsor(
            SuiAddress([1; 32]),
            vec![],
            ProgrammableTransaction::default(),
            1,
            1,
            sponsor,
        );
        assert_eq!(tx.gas_data().owner, sponsor);
        assert_ne!(tx.gas_data().owner, tx.sender());
    }
}
