use utils::shamir::{ParticipantId, ShareError};

/// An error originated from `Credential`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    NoAttributes,
    InvalidAttributeCount { received: usize, supported: usize },
    ZeroCredential,
    PairingCheckFailed,
}

/// An error originated from `Credential::aggregate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregationError {
    NoCredentials,
    InvalidHFor(ParticipantId),
    Share(ShareError),
}

impl From<ShareError> for AggregationError {
    fn from(err: ShareError) -> Self {
        Self::Share(err)
    }
}
