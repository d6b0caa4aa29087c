use coconut::{CredentialError, ShowingError};
use utils::{shamir::ParticipantId, shamir::ShareError, wire::WireError};

use crate::{object::ObjectKind, vote::VoteError};

/// One of the lists of a `Transaction`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxField {
    Inputs,
    ReferenceInputs,
    Parameters,
    Outputs,
    Returns,
    Dependencies,
}

/// Why a checker refused a transaction. Every variant is reported to the ledger as a plain
/// rejection, the classes only matter for diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// Malformed transaction, rejected before any cryptography.
    Precondition(Precondition),
    /// A proof was checked and did not verify.
    ProofInvalid(ProofFailure),
    /// Well formed and correctly proven, but the state transition is not allowed.
    Invariant(Violation),
    /// A tally is outside the range of the discrete log table.
    RangeExceeded { bound: u64 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Precondition {
    Arity {
        field: TxField,
        expected: usize,
        received: usize,
    },
    Decode {
        field: TxField,
        index: usize,
        error: WireError,
    },
    UnexpectedKind {
        expected: ObjectKind,
        found: ObjectKind,
    },
    ContractMismatch {
        expected: String,
        found: String,
    },
    UnknownMethod(String),
    Showing(ShowingError),
    Vote(VoteError),
    InsufficientShares {
        received: usize,
        required: usize,
    },
    UnknownTrustee(ParticipantId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProofFailure {
    Showing(ShowingError),
    Vote(VoteError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Violation {
    FieldChanged(&'static str),
    NotInitial(&'static str),
    ListDelta,
    DoubleUse,
    UnknownTag,
    UnexpectedBidState { slot: usize },
    NotWinner,
    WinnerCannotWithdraw,
    NoWinner,
    PhaseClosed,
    /// A committed bid is still unrevealed, so the winner isn't settled
    RevealsPending,
    WorkAlreadySubmitted,
    InvalidDeadlines { commit: u64, reveal: u64 },
    InvalidThreshold { threshold: u16, total: u16 },
    InvalidOptions(usize),
    InconsistentTrusteeKeys,
    TallyStarted,
    QuorumChanged,
    QuorumSize { size: usize, threshold: u16 },
    UnsortedQuorum,
    InstanceMismatch,
    TrusteeNotInQuorum(ParticipantId),
    DuplicateShare(ParticipantId),
    SlotOutOfRange(usize),
    SlotAlreadyFilled(usize),
    SlotMismatch(usize),
    CallbackMismatch { expected: String, found: String },
    OutcomeMismatch,
    NoAttributes,
}

impl From<Precondition> for Rejection {
    fn from(p: Precondition) -> Self {
        Self::Precondition(p)
    }
}

impl From<Violation> for Rejection {
    fn from(v: Violation) -> Self {
        Self::Invariant(v)
    }
}

impl From<ShowingError> for Rejection {
    fn from(e: ShowingError) -> Self {
        if e.is_precondition() {
            Self::Precondition(Precondition::Showing(e))
        } else {
            Self::ProofInvalid(ProofFailure::Showing(e))
        }
    }
}

impl From<VoteError> for Rejection {
    fn from(e: VoteError) -> Self {
        match e {
            VoteError::RangeExceeded { bound } => Self::RangeExceeded { bound },
            e if e.is_precondition() => Self::Precondition(Precondition::Vote(e)),
            e => Self::ProofInvalid(ProofFailure::Vote(e)),
        }
    }
}

/// Failure of a contract method, i.e. on the side building a transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContractError {
    Showing(ShowingError),
    Credential(CredentialError),
    Vote(VoteError),
    Wire(WireError),
    Share(ShareError),
    Precondition(Precondition),
    Violation(Violation),
    InvalidArgument(&'static str),
}

impl From<ShowingError> for ContractError {
    fn from(e: ShowingError) -> Self {
        Self::Showing(e)
    }
}

impl From<CredentialError> for ContractError {
    fn from(e: CredentialError) -> Self {
        Self::Credential(e)
    }
}

impl From<VoteError> for ContractError {
    fn from(e: VoteError) -> Self {
        Self::Vote(e)
    }
}

impl From<WireError> for ContractError {
    fn from(e: WireError) -> Self {
        Self::Wire(e)
    }
}

impl From<ShareError> for ContractError {
    fn from(e: ShareError) -> Self {
        Self::Share(e)
    }
}

impl From<Precondition> for ContractError {
    fn from(p: Precondition) -> Self {
        Self::Precondition(p)
    }
}

impl From<Violation> for ContractError {
    fn from(v: Violation) -> Self {
        Self::Violation(v)
    }
}

impl From<Rejection> for ContractError {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::Precondition(p) => Self::Precondition(p),
            Rejection::ProofInvalid(ProofFailure::Showing(e)) => Self::Showing(e),
            Rejection::ProofInvalid(ProofFailure::Vote(e)) => Self::Vote(e),
            Rejection::Invariant(v) => Self::Violation(v),
            Rejection::RangeExceeded { bound } => Self::Vote(VoteError::RangeExceeded { bound }),
        }
    }
}
