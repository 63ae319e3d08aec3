//! Input table and command arena.
//!
//! Inputs are deduplicated: identical pure bytes share one slot, objects
//! share one slot per id. Object inputs may stay *pending* (id plus
//! mutability) until a single batch resolution fills in their live state.
//! Commands only ever reference earlier slots, so the resulting list is a
//! forward-only DAG by construction.

use crate::codec::{self, Encode};
use crate::core::errors::ValidationError;
use crate::transaction::data::{
    Argument, CallArg, Command, ObjectArg, ProgrammableTransaction, MAX_PURE_ARGUMENT_SIZE,
};
use crate::types::ObjectId;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
enum InputSlot {
    Pure(Vec<u8>),
    Object(ObjectArg),
    PendingObject { id: ObjectId, mutable: bool },
}

/// Accumulates inputs and commands for one programmable transaction.
#[derive(Debug, Default)]
pub struct ProgrammableTransactionBuilder {
    inputs: Vec<InputSlot>,
    commands: Vec<Command>,
    object_index: HashMap<ObjectId, u16>,
    pure_index: HashMap<Vec<u8>, u16>,
}

impl ProgrammableTransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Encode a value inline as a pure input.
    pub fn pure<T: Encode + ?Sized>(&mut self, value: &T) -> Result<Argument, ValidationError> {
        self.pure_bytes(codec::to_bytes(value))
    }

    /// Register pre-encoded pure bytes.
    pub fn pure_bytes(&mut self, bytes: Vec<u8>) -> Result<Argument, ValidationError> {
        if bytes.len() > MAX_PURE_ARGUMENT_SIZE {
            return Err(ValidationError::PureArgumentTooLarge(bytes.len()));
        }
        if let Some(&idx) = self.pure_index.get(&bytes) {
            return Ok(Argument::Input(idx));
        }
        let idx = self.next_input_index()?;
        self.pure_index.insert(bytes.clone(), idx);
        self.inputs.push(InputSlot::Pure(bytes));
        Ok(Argument::Input(idx))
    }

    /// Register a fully resolved object input.
    pub fn obj(&mut self, arg: ObjectArg) -> Result<Argument, ValidationError> {
        let id = arg.id();
        if let Some(&idx) = self.object_index.get(&id) {
            self.upgrade_slot(idx as usize, InputSlot::Object(arg));
            return Ok(Argument::Input(idx));
        }
        let idx = self.next_input_index()?;
        self.object_index.insert(id, idx);
        self.inputs.push(InputSlot::Object(arg));
        Ok(Argument::Input(idx))
    }

    /// Register an object by id only; live state is attached during batch
    /// resolution. Requesting the same id again merges the mutability flag.
    pub fn pending_object(&mut self, id: ObjectId, mutable: bool) -> Result<Argument, ValidationError> {
        if let Some(&idx) = self.object_index.get(&id) {
            if let InputSlot::PendingObject { mutable: existing, .. } = &mut self.inputs[idx as usize]
            {
                *existing = *existing || mutable;
            }
            return Ok(Argument::Input(idx));
        }
        let idx = self.next_input_index()?;
        self.object_index.insert(id, idx);
        self.inputs.push(InputSlot::PendingObject { id, mutable });
        Ok(Argument::Input(idx))
    }

    /// Append a command, returning its result handle.
    pub fn command(&mut self, command: Command) -> Argument {
        let idx = self.commands.len() as u16;
        self.commands.push(command);
        Argument::Result(idx)
    }

    /// Result handles for a command returning `count` values.
    pub fn nested_results(&self, command_index: u16, count: usize) -> Vec<Argument> {
        (0..count)
            .map(|sub| Argument::NestedResult(command_index, sub as u16))
            .collect()
    }

    /// Ids (and mutability) of every input still awaiting resolution.
    pub fn pending_object_ids(&self) -> Vec<(ObjectId, bool)> {
        self.inputs
            .iter()
            .filter_map(|slot| match slot {
                InputSlot::PendingObject { id, mutable } => Some((*id, *mutable)),
                _ => None,
            })
            .collect()
    }

    /// Attach resolved state to every pending input. Missing entries are
    /// fatal; a partially resolved transaction is never emitted.
    pub fn resolve_pending(
        &mut self,
        resolved: &HashMap<ObjectId, ObjectArg>,
    ) -> Result<(), ValidationError> {
        for slot in &mut self.inputs {
            if let InputSlot::PendingObject { id, .. } = slot {
                let arg = resolved
                    .get(id)
                    .ok_or_else(|| ValidationError::ObjectNotFound(id.to_hex()))?;
                *slot = InputSlot::Object(*arg);
            }
        }
        Ok(())
    }

    /// Whether the object id is already consumed as an input.
    pub fn contains_input_object(&self, id: &ObjectId) -> bool {
        self.object_index.contains_key(id)
    }

    /// Whether some pure input carries exactly these bytes.
    pub fn contains_pure_bytes(&self, bytes: &[u8]) -> bool {
        self.pure_index.contains_key(bytes)
    }

    /// Freeze into the wire representation. All object inputs must have
    /// been resolved by now.
    pub fn finish(&self) -> Result<ProgrammableTransaction, ValidationError> {
        let mut inputs = Vec::with_capacity(self.inputs.len());
        for slot in &self.inputs {
            match slot {
                InputSlot::Pure(bytes) => inputs.push(CallArg::Pure(bytes.clone())),
                InputSlot::Object(arg) => inputs.push(CallArg::Object(*arg)),
                InputSlot::PendingObject { id, .. } => {
                    return Err(ValidationError::ObjectNotFound(id.to_hex()));
                }
            }
        }
        Ok(ProgrammableTransaction { inputs, commands: self.commands.clone() })
    }

    fn next_input_index(&self) -> Result<u16, ValidationError> {
        u16::try_from(self.inputs.len())
            .map_err(|_| ValidationError::PureArgumentTooLarge(self.inputs.len()))
    }

    fn upgrade_slot(&mut self, idx: usize, slot: InputSlot) {
        // keep a mutable shared flag once any use required it
        if let (
            InputSlot::Object(ObjectArg::SharedObject { mutable: existing, .. }),
            InputSlot::Object(ObjectArg::SharedObject { mutable: incoming, .. }),
        ) = (&self.inputs[idx], &slot)
        {
            if *existing && !*incoming {
                return;
            }
        }
        self.inputs[idx] = slot;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ObjectDigest, ObjectRef, SuiAddress};

    fn owned(seed: u8) -> ObjectArg {
        ObjectArg::ImmOrOwnedObject(ObjectRef {
            object_id: SuiAddress([seed; 32]),
            version: 1,
            digest: ObjectDigest([seed; 32]),
        })
    }

    #[test]
    fn test_pure_inputs_deduplicate() {
        let mut builder = ProgrammableTransactionBuilder::new();
        let a = builder.pure(&5u64).unwrap();
        let b = builder.pure(&5u64).unwrap();
        let c = builder.pure(&6u64).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(builder.finish().unwrap().inputs.len(), 2);
    }

    #[test]
    fn test_pure_size_cap() {
        let mut builder = ProgrammableTransactionBuilder::new();
        let oversized = vec![0u8; MAX_PURE_ARGUMENT_SIZE + 1];
        assert!(matches!(
            builder.pure_bytes(oversized).unwrap_err(),
            ValidationError::PureArgumentTooLarge(_)
        ));
    }

    #[test]
    fn test_object_inputs_deduplicate_by_id() {
        let mut builder = ProgrammableTransactionBuilder::new();
        let a = builder.obj(owned(1)).unwrap();
        let b = builder.obj(owned(1)).unwrap();
        assert_eq!(a, b);
        assert!(builder.contains_input_object(&SuiAddress([1; 32])));
        assert!(!builder.contains_input_object(&SuiAddress([2; 32])));
    }

    #[test]
    fn test_pending_object_mutability_merges() {
        let mut builder = ProgrammableTransactionBuilder::new();
        let id = SuiAddress([3; 32]);
        builder.pending_object(id, false).unwrap();
        builder.pending_object(id, true).unwrap();
        builder.pending_object(id, false).unwrap();
        assert_eq!(builder.pending_object_ids(), vec![(id, true)]);
    }

    #[test]
    fn test_finish_rejects_unresolved_inputs() {
        let mut builder = ProgrammableTransactionBuilder::new();
        builder.pending_object(SuiAddress([4; 32]), false).unwrap();
        assert!(matches!(
            builder.finish().unwrap_err(),
            ValidationError::ObjectNotFound(_)
        ));

        let mut resolved = HashMap::new();
        resolved.insert(SuiAddress([4; 32]), owned(4));
        builder.resolve_pending(&resolved).unwrap();
        assert_eq!(builder.finish().unwrap().inputs.len(), 1);
    }

    #[test]
    fn test_resolve_requires_every_pending_id() {
        let mut builder = ProgrammableTransactionBuilder::new();
        builder.pending_object(SuiAddress([5; 32]), false).unwrap();
        builder.pending_object(SuiAddress([6; 32]), false).unwrap();

        let mut partial = HashMap::new();
        partial.insert(SuiAddress([5; 32]), owned(5));
        assert!(builder.resolve_pending(&partial).is_err());
    }

    #[test]
    fn test_commands_index_forward() {
        let mut builder = ProgrammableTransactionBuilder::new();
        let amount = builder.pure(&100u64).unwrap();
        let split = builder.command(Command::SplitCoins(Argument::GasCoin, vec![amount]));
        assert_eq!(split, Argument::Result(0));

        let results = builder.nested_results(0, 2);
        assert_eq!(results, vec![Argument::NestedResult(0, 0), Argument::NestedResult(0, 1)]);

        let recipient = builder.pure(&SuiAddress([7; 32])).unwrap();
        let transfer = builder.command(Command::TransferObjects(vec![results[0]], recipient));
        assert_eq!(transfer, Argument::Result(1));
    }
}
