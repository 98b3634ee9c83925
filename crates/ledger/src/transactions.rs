//! Transaction primitives.
//!
//! A `Transaction` is one immutable record of the append-only log. Records
//! are never edited in place; the balance snapshot is always derived by
//! replaying the whole log in insertion order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Amount, LedgerError, ResultLedger};

/// Reserved name the ledger owner appears under in `person` fields.
///
/// A record attributed to this name (or to nobody) has no per-counterparty
/// effect, and the split distributor uses it to identify the payer.
pub const SELF: &str = "Self";

/// Semantic kind of a record; drives the snapshot reduction rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Money spent from a wallet; counts toward the weekly figure.
    Expense,
    /// Money entering a wallet.
    TransferIn,
    /// Money leaving a wallet toward a counterparty.
    TransferOut,
    /// Repayment received from a counterparty (settle up).
    Received,
    /// The full fronted total of a shared expense, against the payer wallet.
    SplitMain,
    /// The payer's own share of a shared expense (weekly figure only).
    SplitShare,
    /// One participant's owed share of a shared expense (debt only).
    SplitDebit,
    /// Manual wallet correction, direction given by [`CorrectionMode`].
    Correction,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::TransferIn => "transfer_in",
            Self::TransferOut => "transfer_out",
            Self::Received => "received",
            Self::SplitMain => "split_main",
            Self::SplitShare => "split_share",
            Self::SplitDebit => "split_debit",
            Self::Correction => "correction",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "expense" => Ok(Self::Expense),
            "transfer_in" => Ok(Self::TransferIn),
            "transfer_out" => Ok(Self::TransferOut),
            "received" => Ok(Self::Received),
            "split_main" => Ok(Self::SplitMain),
            "split_share" => Ok(Self::SplitShare),
            "split_debit" => Ok(Self::SplitDebit),
            "correction" => Ok(Self::Correction),
            other => Err(LedgerError::InvalidAmount(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

/// Which wallet a record affects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    #[default]
    Cash,
    Bank,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Bank => "bank",
        }
    }
}

impl TryFrom<&str> for Source {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "cash" => Ok(Self::Cash),
            "bank" => Ok(Self::Bank),
            other => Err(LedgerError::InvalidAmount(format!(
                "invalid source: {other}"
            ))),
        }
    }
}

/// Direction of a manual [`Correction`](TransactionKind::Correction).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionMode {
    In,
    Out,
}

impl CorrectionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

impl TryFrom<&str> for CorrectionMode {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "in" => Ok(Self::In),
            "out" => Ok(Self::Out),
            other => Err(LedgerError::InvalidAmount(format!(
                "invalid correction mode: {other}"
            ))),
        }
    }
}

/// One record of the append-only log.
///
/// The amount carries no sign; the direction of the wallet and
/// per-counterparty effects is implied by `kind` (and, for corrections, by
/// `mode`). `note` and `tag` are free text the engine never interprets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Stable identifier for this record.
    ///
    /// Generated once at construction so callers can key UI lists on it;
    /// the engine itself never reads it.
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub kind: TransactionKind,
    pub amount: Amount,
    pub note: String,
    pub person: Option<String>,
    #[serde(default)]
    pub source: Source,
    pub tag: Option<String>,
    pub mode: Option<CorrectionMode>,
    /// Excludes this record from the rolling weekly-spend figure.
    #[serde(default)]
    pub week_reset: bool,
}

impl Transaction {
    /// Creates a record, rejecting negative amounts.
    ///
    /// Invalid amounts are never swallowed: the caller gets an
    /// [`LedgerError::InvalidAmount`] it can surface.
    pub fn new(
        kind: TransactionKind,
        date: DateTime<Utc>,
        amount: Amount,
        note: String,
        person: Option<String>,
        source: Source,
        tag: Option<String>,
    ) -> ResultLedger<Self> {
        if amount.is_negative() {
            return Err(LedgerError::InvalidAmount(
                "amount must be >= 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            date,
            kind,
            amount,
            note,
            person,
            source,
            tag,
            mode: None,
            week_reset: false,
        })
    }

    /// Excludes the record from the rolling weekly-spend figure.
    ///
    /// Applied at creation time, before the record enters the log; logged
    /// records are never edited.
    #[must_use]
    pub fn with_week_reset(mut self, week_reset: bool) -> Self {
        self.week_reset = week_reset;
        self
    }

    /// Creates a manual wallet correction with an explicit direction.
    pub fn correction(
        date: DateTime<Utc>,
        amount: Amount,
        mode: CorrectionMode,
        source: Source,
        note: String,
    ) -> ResultLedger<Self> {
        let mut tx = Self::new(
            TransactionKind::Correction,
            date,
            amount,
            note,
            None,
            source,
            None,
        )?;
        tx.mode = Some(mode);
        Ok(tx)
    }
}
