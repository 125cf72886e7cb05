//! Errors raised by the store, the ledger layers and the pipeline.
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub(crate) enum LedgerError {
    /// User input was rejected. Nothing was mutated.
    #[error("{reason}")]
    ValidationFailed { reason: String },

    /// No transaction with the given id exists.
    #[error("no transaction with id '{id}'")]
    NotFound { id: String },

    /// The persistence port could not be written, or the payload could not be encoded.
    ///
    /// In-memory state is never rolled back because of this.
    #[error("could not save transactions: {reason}")]
    PersistenceFailed { reason: String },

    /// A pipeline step called its continuation more than once.
    #[error("pipeline step '{step}' invoked its continuation twice")]
    InternalReentry { step: String },
}

impl LedgerError {
    pub(crate) fn validation(reason: impl Into<String>) -> Self {
        Self::ValidationFailed {
            reason: reason.into(),
        }
    }

    pub(crate) fn persistence(reason: impl std::fmt::Display) -> Self {
        Self::PersistenceFailed {
            reason: reason.to_string(),
        }
    }

    pub(crate) fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationFailed { .. })
    }
}

impl From<rusqlite::Error> for LedgerError {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Self::persistence(value)
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(value: serde_json::Error) -> Self {
        Self::persistence(value)
    }
}

pub(crate) type Result<T> = std::result::Result<T, LedgerError>;
