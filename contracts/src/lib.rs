//! # Privacy preserving ledger contracts over Coconut credentials
//!
//! Every contract is a value holding its public parameters. Its methods build complete
//! transactions on the prover side, and its `Checker` implementation decides on the ledger side
//! whether a transaction is a valid state transition, verifying the proofs it carries.
//!
//! - [`petition`]: anonymous yes/no petitions with encrypted votes decrypted by a threshold of
//!   trustees.
//! - [`auction`]: sealed bid auctions with commit, reveal, withdraw and work submission.
//! - [`tumbler`]: coins redeemed once to an address bound into the showing.
//! - [`issuance`]: bookkeeping of threshold credential issuance and generic showings.
//!
//! Objects are typed ([`object::LedgerObject`]) and carried in transactions as hex strings of
//! their canonical encoding. [`ledger::Ledger`] keeps the live object versions and applies
//! accepted transactions.

pub mod auction;
pub mod checker;
pub mod error;
pub mod issuance;
pub mod ledger;
pub mod object;
pub mod petition;
pub mod transaction;
pub mod tumbler;
pub mod vote;

pub use auction::{Auction, AuctionContract, BidEntry};
pub use checker::Checker;
pub use error::{ContractError, Precondition, ProofFailure, Rejection, TxField, Violation};
pub use issuance::{CredentialInstance, CredentialRequest, IssuanceContract};
pub use ledger::{Ledger, LedgerError, ObjectId};
pub use object::{LedgerObject, ObjectKind, SpentListKind, SpentTagList, TokenKind};
pub use petition::{Petition, PetitionContract};
pub use transaction::{Arity, Transaction};
pub use tumbler::TumblerContract;
pub use vote::{VoteError, VoteParams};
