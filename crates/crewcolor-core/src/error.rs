//! Error types for `crewcolor-core`.

use crewcolor_storage::StorageError;

/// Errors from reading or writing the color board.
///
/// Positions are 1-based, matching how members are numbered on screen.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// No member count has been stored yet.
    #[error("numOfMember has not been set")]
    CountNotSet,

    /// The stored member count is not a non-negative integer.
    #[error("stored numOfMember '{value}' is not a number")]
    CorruptCount { value: String },

    /// A member inside the stored count has no color.
    #[error("{position}-th color has not been set")]
    ColorNotSet { position: usize },

    /// A submission left a member's color empty.
    #[error("{position}-th color is not selected")]
    ColorNotSelected { position: usize },

    /// The underlying storage backend returned an error.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl BoardError {
    /// Whether the error was caused by caller input rather than the store.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ColorNotSelected { .. })
    }
}
