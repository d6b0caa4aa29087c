use utils::shamir::{ParticipantId, ShareError};

/// An error originated from threshold key generation or verification key aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeygenError {
    NoAttributes,
    NoKeys,
    IncompatibleKey(ParticipantId),
    Share(ShareError),
}

impl From<ShareError> for KeygenError {
    fn from(err: ShareError) -> Self {
        Self::Share(err)
    }
}
