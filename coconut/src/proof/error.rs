use alloc::{format, string::String};
use ark_serialize::SerializationError;

/// An error originated from `ShowingProof`. The first group are rejected before any group
/// operation, the second group are verification failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShowingError {
    NoPrivateAttributes,
    TooManyAttributes { received: usize, supported: usize },
    InvalidVerificationKey,
    ResponseCountMismatch { received: usize, expected: usize },
    ZeroCredential,
    ChallengeMismatch,
    PairingCheckFailed,
    Serialization(String),
}

impl ShowingError {
    /// `true` for malformed inputs, `false` for a proof that was checked and failed.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::NoPrivateAttributes
                | Self::TooManyAttributes { .. }
                | Self::InvalidVerificationKey
                | Self::ResponseCountMismatch { .. }
                | Self::Serialization(_)
        )
    }
}

impl From<SerializationError> for ShowingError {
    fn from(err: SerializationError) -> Self {
        Self::Serialization(format!("{:?}", err))
    }
}
