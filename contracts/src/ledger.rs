//! In-memory store of live object versions. A version is identified by the digest of its
//! canonical encoding. Applying a transaction consumes its input versions and creates its
//! outputs, all or nothing, after the checker of the contract accepted it, so a version can be
//! consumed once.

use core::{fmt, marker::PhantomData};
use std::collections::HashMap;

use digest::Digest;
use tracing::{debug, warn};
use utils::wire::{decode_hex, WireError};

use crate::{checker::Checker, error::Rejection, transaction::Transaction};

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub Vec<u8>);

impl ObjectId {
    pub fn new<D: Digest>(encoding: &[u8]) -> Self {
        Self(D::digest(encoding).to_vec())
    }

    /// Id of the object carried in a transaction as `encoded`.
    pub fn from_hex<D: Digest>(encoded: &str) -> Result<Self, WireError> {
        Ok(Self::new::<D>(&decode_hex(encoded)?))
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerError {
    UnknownContract(String),
    Rejected {
        contract: String,
        method: String,
        reason: Rejection,
    },
    /// The input version was never created or is already consumed.
    InactiveInput(ObjectId),
    InactiveReference(ObjectId),
    Wire(WireError),
}

impl From<WireError> for LedgerError {
    fn from(e: WireError) -> Self {
        Self::Wire(e)
    }
}

pub struct Ledger<D> {
    contracts: HashMap<String, Box<dyn Checker>>,
    /// Live versions and their hex encoding.
    objects: HashMap<ObjectId, String>,
    _digest: PhantomData<D>,
}

impl<D: Digest> Default for Ledger<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Digest> Ledger<D> {
    pub fn new() -> Self {
        Self {
            contracts: HashMap::new(),
            objects: HashMap::new(),
            _digest: PhantomData,
        }
    }

    /// Deploys `contract` under its id, replacing any contract deployed under the same id.
    pub fn deploy(&mut self, contract: impl Checker + 'static) {
        self.contracts
            .insert(contract.contract_id().to_string(), Box::new(contract));
    }

    pub fn is_live(&self, encoded: &str) -> bool {
        ObjectId::from_hex::<D>(encoded).is_ok_and(|id| self.objects.contains_key(&id))
    }

    pub fn get(&self, id: &ObjectId) -> Option<&str> {
        self.objects.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Checks `tx` and its dependencies, dependencies first, and applies all of them or none.
    /// Returns the ids of the versions created by `tx` itself.
    pub fn apply(&mut self, tx: &Transaction) -> Result<Vec<ObjectId>, LedgerError> {
        let mut staged = self.objects.clone();
        let created = self.stage(&mut staged, tx)?;
        self.objects = staged;
        debug!(
            contract = %tx.contract_id,
            method = %tx.method_id,
            created = created.len(),
            live = self.objects.len(),
            "transaction applied"
        );
        Ok(created)
    }

    fn stage(
        &self,
        staged: &mut HashMap<ObjectId, String>,
        tx: &Transaction,
    ) -> Result<Vec<ObjectId>, LedgerError> {
        for dependency in &tx.dependencies {
            self.stage(staged, dependency)?;
        }

        let contract = self
            .contracts
            .get(&tx.contract_id)
            .ok_or_else(|| LedgerError::UnknownContract(tx.contract_id.clone()))?;
        contract.check(tx).map_err(|reason| {
            debug!(
                contract = %tx.contract_id,
                method = %tx.method_id,
                ?reason,
                "transaction rejected"
            );
            LedgerError::Rejected {
                contract: tx.contract_id.clone(),
                method: tx.method_id.clone(),
                reason,
            }
        })?;

        for encoded in &tx.reference_inputs {
            let id = ObjectId::from_hex::<D>(encoded)?;
            if !staged.contains_key(&id) {
                return Err(LedgerError::InactiveReference(id));
            }
        }
        for encoded in &tx.inputs {
            let id = ObjectId::from_hex::<D>(encoded)?;
            if staged.remove(&id).is_none() {
                warn!(
                    contract = %tx.contract_id,
                    method = %tx.method_id,
                    object = %id,
                    "input is not live, possible double spend"
                );
                return Err(LedgerError::InactiveInput(id));
            }
        }
        tx.outputs
            .iter()
            .map(|encoded| {
                let id = ObjectId::from_hex::<D>(encoded)?;
                staged.insert(id.clone(), encoded.clone());
                Ok(id)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::Precondition,
        object::{LedgerObject, TokenKind},
        tumbler::TumblerContract,
    };
    use ark_bls12_381::{Bls12_381, Fr};
    use ark_std::{
        rand::{rngs::StdRng, SeedableRng},
        UniformRand,
    };
    use blake2::Blake2b512;
    use coconut::{setup::test_setup, Credential};
    use utils::wire::to_hex;

    #[test]
    fn versions_are_consumed_once() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let (sk, vk, params, _) = test_setup::<Bls12_381, Blake2b512, _>(&mut rng, 1);
        let tumbler = TumblerContract::<Bls12_381, Blake2b512>::new(params);
        let mut ledger = Ledger::<Blake2b512>::new();

        let init = tumbler.init().unwrap();
        assert_eq!(
            ledger.apply(&init),
            Err(LedgerError::UnknownContract("tumbler".to_string()))
        );
        ledger.deploy(tumbler.clone());
        let token = ledger.apply(&init).unwrap();
        assert_eq!(token.len(), 1);
        let encoded = to_hex(&LedgerObject::<Bls12_381>::Token(TokenKind::Tumbler)).unwrap();
        assert!(ledger.is_live(&encoded));
        assert_eq!(ledger.get(&token[0]), Some(encoded.as_str()));

        let (create, list) = tumbler.create_tumbler(b"mixer", vk.clone()).unwrap();
        let created = ledger.apply(&create).unwrap();
        assert_eq!(ledger.len(), 2);
        // The re-emitted token has the same encoding, so the same id, as the consumed one
        assert_eq!(created[0], token[0]);

        let coin = Fr::rand(&mut rng);
        let credential = Credential::new(&mut rng, &[coin], &sk, &tumbler.params.g1).unwrap();
        let (redeem, _) = tumbler
            .redeem(&mut rng, &list, &credential, &coin, b"alice")
            .unwrap();
        ledger.apply(&redeem).unwrap();
        assert!(!ledger.is_live(&create.outputs[1]));
        assert_eq!(
            ledger.apply(&redeem),
            Err(LedgerError::InactiveInput(created[1].clone()))
        );
        assert_eq!(ledger.len(), 2);

        // A rejected dependency rejects the whole bundle
        let mut broken = tumbler.init().unwrap();
        broken.outputs.clear();
        let (bundle, _) = tumbler.create_tumbler(b"mixer-2", vk).unwrap();
        let bundle = bundle.with_dependency(broken);
        assert!(matches!(
            ledger.apply(&bundle),
            Err(LedgerError::Rejected {
                reason: Rejection::Precondition(Precondition::Arity { .. }),
                ..
            })
        ));
        assert_eq!(ledger.len(), 2);
    }
}
