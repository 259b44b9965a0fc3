//! Document lifecycle state machine.
//!
//! Status moves along `pending -> processing -> ready -> completed`, always
//! forward and always by explicit operator action. `processing` may be
//! skipped (the operator uploads the decrypted replacement and flips the
//! record straight to `ready`), but `completed` is only reachable from
//! `ready` so that signed references exist for every completed document.
//! `ready -> ready` is the idempotent refresh: re-entering `ready` simply
//! re-issues the signed URLs.

use crate::error::AppError;
use crate::models::DocumentStatus;

impl DocumentStatus {
    fn rank(self) -> u8 {
        match self {
            DocumentStatus::Pending => 0,
            DocumentStatus::Processing => 1,
            DocumentStatus::Ready => 2,
            DocumentStatus::Completed => 3,
        }
    }

    /// Whether a move from `self` to `to` is legal.
    pub fn can_transition_to(self, to: DocumentStatus) -> bool {
        match (self, to) {
            // Idempotent refresh of signed references.
            (DocumentStatus::Ready, DocumentStatus::Ready) => true,
            // Completed is terminal.
            (DocumentStatus::Completed, _) => false,
            // Completed requires signed references, so it is only reachable
            // from ready.
            (from, DocumentStatus::Completed) => from == DocumentStatus::Ready,
            (from, to) => to.rank() > from.rank(),
        }
    }
}

/// Validate a status move, returning `InvalidTransition` for illegal ones.
pub fn validate_transition(from: DocumentStatus, to: DocumentStatus) -> Result<(), AppError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(AppError::InvalidTransition { from, to })
    }
}
