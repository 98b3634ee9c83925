//! The module contains the errors the ledger can return.
//!
//! Every failure in this crate is a value: nothing here panics and no
//! operation is retryable, because every computation is deterministic.
//!
//! The errors are:
//!
//! - [`SumExceedsTotal`] returned when manual split amounts alone exceed the
//!   total being distributed.
//! - [`InvalidAmount`] returned when a total or amount fails validation
//!   before any record is created.
//!
//! [`SumExceedsTotal`]: LedgerError::SumExceedsTotal
//! [`InvalidAmount`]: LedgerError::InvalidAmount
use thiserror::Error;

/// Ledger custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("sum exceeds total: {0}")]
    SumExceedsTotal(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid participant: {0}")]
    InvalidParticipant(String),
}
