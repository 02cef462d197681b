//! Error types for product generation.

use thiserror::Error;

use crate::profile::ProfileError;
use crate::store::StoreError;

/// Errors that can occur while generating products.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The catalog store rejected an operation.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The generation profile is unusable.
    #[error("profile error: {0}")]
    Profile(#[from] ProfileError),
}

impl GenerateError {
    /// Whether a batch run should stop instead of moving on to the next
    /// product.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Store(StoreError::Unauthorized) | Self::Profile(_)
        )
    }
}
