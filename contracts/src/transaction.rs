//! Transactions as exchanged with the ledger: every element is the hex string of the compressed
//! canonical encoding of an object, a proof or a value.

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use serde::{Deserialize, Serialize};
use utils::wire::{from_hex, to_hex, WireError};

use crate::error::{Precondition, TxField};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub contract_id: String,
    pub method_id: String,
    /// Object versions consumed by the transaction.
    pub inputs: Vec<String>,
    /// Object versions read but not consumed.
    pub reference_inputs: Vec<String>,
    pub parameters: Vec<String>,
    /// Object versions created by the transaction.
    pub outputs: Vec<String>,
    pub returns: Vec<String>,
    /// Transactions that must be accepted together with this one.
    pub dependencies: Vec<Transaction>,
}

impl Transaction {
    pub fn new(contract_id: impl Into<String>, method_id: impl Into<String>) -> Self {
        Self {
            contract_id: contract_id.into(),
            method_id: method_id.into(),
            ..Default::default()
        }
    }

    /// `contract_id.method_id`, what a request object records as its callback.
    pub fn callback_id(&self) -> String {
        format!("{}.{}", self.contract_id, self.method_id)
    }

    pub fn field(&self, field: TxField) -> &[String] {
        match field {
            TxField::Inputs => &self.inputs,
            TxField::ReferenceInputs => &self.reference_inputs,
            TxField::Parameters => &self.parameters,
            TxField::Outputs => &self.outputs,
            TxField::Returns => &self.returns,
            TxField::Dependencies => &[],
        }
    }

    pub fn field_len(&self, field: TxField) -> usize {
        match field {
            TxField::Dependencies => self.dependencies.len(),
            _ => self.field(field).len(),
        }
    }

    /// Decodes element `index` of `field`. A missing element is reported like a malformed one.
    pub fn decode<T: CanonicalDeserialize>(
        &self,
        field: TxField,
        index: usize,
    ) -> Result<T, Precondition> {
        let encoded = self
            .field(field)
            .get(index)
            .ok_or(Precondition::Arity {
                field,
                expected: index + 1,
                received: self.field_len(field),
            })?;
        from_hex(encoded).map_err(|error| Precondition::Decode {
            field,
            index,
            error,
        })
    }

    pub fn input<T: CanonicalDeserialize>(&self, index: usize) -> Result<T, Precondition> {
        self.decode(TxField::Inputs, index)
    }

    pub fn reference_input<T: CanonicalDeserialize>(
        &self,
        index: usize,
    ) -> Result<T, Precondition> {
        self.decode(TxField::ReferenceInputs, index)
    }

    pub fn parameter<T: CanonicalDeserialize>(&self, index: usize) -> Result<T, Precondition> {
        self.decode(TxField::Parameters, index)
    }

    pub fn output<T: CanonicalDeserialize>(&self, index: usize) -> Result<T, Precondition> {
        self.decode(TxField::Outputs, index)
    }

    pub fn returned<T: CanonicalDeserialize>(&self, index: usize) -> Result<T, Precondition> {
        self.decode(TxField::Returns, index)
    }

    pub fn with_input<T: CanonicalSerialize + ?Sized>(mut self, item: &T) -> Result<Self, WireError> {
        self.inputs.push(to_hex(item)?);
        Ok(self)
    }

    pub fn with_reference_input<T: CanonicalSerialize + ?Sized>(
        mut self,
        item: &T,
    ) -> Result<Self, WireError> {
        self.reference_inputs.push(to_hex(item)?);
        Ok(self)
    }

    pub fn with_parameter<T: CanonicalSerialize + ?Sized>(
        mut self,
        item: &T,
    ) -> Result<Self, WireError> {
        self.parameters.push(to_hex(item)?);
        Ok(self)
    }

    pub fn with_output<T: CanonicalSerialize + ?Sized>(
        mut self,
        item: &T,
    ) -> Result<Self, WireError> {
        self.outputs.push(to_hex(item)?);
        Ok(self)
    }

    pub fn with_return<T: CanonicalSerialize + ?Sized>(
        mut self,
        item: &T,
    ) -> Result<Self, WireError> {
        self.returns.push(to_hex(item)?);
        Ok(self)
    }

    pub fn with_dependency(mut self, dependency: Transaction) -> Self {
        self.dependencies.push(dependency);
        self
    }
}

/// Expected number of elements in each list of a transaction for one method.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Arity {
    pub inputs: usize,
    pub reference_inputs: usize,
    pub parameters: usize,
    pub outputs: usize,
    pub returns: usize,
}

impl Arity {
    pub const fn new(
        inputs: usize,
        reference_inputs: usize,
        parameters: usize,
        outputs: usize,
        returns: usize,
    ) -> Self {
        Self {
            inputs,
            reference_inputs,
            parameters,
            outputs,
            returns,
        }
    }

    pub fn check(&self, tx: &Transaction) -> Result<(), Precondition> {
        for (field, expected) in [
            (TxField::Inputs, self.inputs),
            (TxField::ReferenceInputs, self.reference_inputs),
            (TxField::Parameters, self.parameters),
            (TxField::Outputs, self.outputs),
            (TxField::Returns, self.returns),
        ] {
            let received = tx.field_len(field);
            if received != expected {
                return Err(Precondition::Arity {
                    field,
                    expected,
                    received,
                });
            }
        }
        Ok(())
    }
}
