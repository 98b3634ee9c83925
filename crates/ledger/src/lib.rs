//! Append-only expense ledger and the pure computations derived from it.
//!
//! The log is the only source of truth: balances are never stored, they are
//! recomputed by [`compute`] on demand. [`distribute`] allocates a shared
//! expense across participants, and [`Ledger`] ties both together with the
//! participant registry and the record-synthesis workflow.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use balance::{BalanceSnapshot, compute};
pub use error::LedgerError;
pub use money::Amount;
pub use split::{SplitOutcome, distribute};
pub use transactions::{CorrectionMode, SELF, Source, Transaction, TransactionKind};

mod balance;
mod error;
mod money;
mod split;
mod transactions;

type ResultLedger<T> = Result<T, LedgerError>;

/// Tags seeded into a fresh ledger for the caller's categorization forms.
/// The engine never interprets them.
const DEFAULT_TAGS: [&str; 5] = ["Food", "Transport", "Bills", "Entertainment", "Shopping"];

/// One independent expense ledger: the transaction log plus the participant
/// registry.
///
/// Ledgers are plain owned values, so tests and multi-profile callers can
/// hold as many as they want; there is no shared global state. The whole
/// struct serializes, which is how the surrounding application is expected
/// to persist it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ledger {
    transactions: Vec<Transaction>,
    participants: Vec<String>,
    tags: Vec<String>,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            transactions: Vec::new(),
            participants: Vec::new(),
            tags: DEFAULT_TAGS.iter().map(|tag| tag.to_string()).collect(),
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Registers a counterparty name.
    ///
    /// Registration only records the name; a participant carries no balance
    /// of its own until transactions reference it.
    pub fn add_participant(&mut self, name: &str) -> ResultLedger<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::InvalidParticipant(
                "name must not be empty".to_string(),
            ));
        }
        if name == SELF {
            return Err(LedgerError::InvalidParticipant(format!(
                "{SELF} is reserved for the ledger owner"
            )));
        }
        if self.participants.iter().any(|existing| existing == name) {
            return Err(LedgerError::ExistingKey(name.to_string()));
        }
        tracing::debug!(participant = name, "registered participant");
        self.participants.push(name.to_string());
        Ok(())
    }

    /// Unregisters a counterparty.
    ///
    /// Records referencing the name stay in the log; the snapshot fold
    /// tolerates them and simply leaves the name out of `per_person`.
    pub fn remove_participant(&mut self, name: &str) -> ResultLedger<()> {
        match self.participants.iter().position(|existing| existing == name) {
            Some(index) => {
                self.participants.remove(index);
                tracing::debug!(participant = name, "removed participant");
                Ok(())
            }
            None => Err(LedgerError::KeyNotFound(name.to_string())),
        }
    }

    /// Adds a tag label for the caller's categorization forms.
    ///
    /// Tags are free text; the snapshot fold never interprets them.
    pub fn add_tag(&mut self, tag: &str) -> ResultLedger<()> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(LedgerError::InvalidAmount(
                "tag must not be empty".to_string(),
            ));
        }
        if self.tags.iter().any(|existing| existing == tag) {
            return Err(LedgerError::ExistingKey(tag.to_string()));
        }
        tracing::debug!(tag, "added tag");
        self.tags.push(tag.to_string());
        Ok(())
    }

    /// Appends one record and returns a fresh snapshot.
    pub fn append(&mut self, tx: Transaction) -> BalanceSnapshot {
        tracing::debug!(id = %tx.id, kind = tx.kind.as_str(), "appended transaction");
        self.transactions.push(tx);
        self.snapshot()
    }

    /// Removes one record by log position.
    ///
    /// There is no delta-based undo: the caller takes a fresh snapshot
    /// afterward and the replay accounts for the removal.
    pub fn delete(&mut self, index: usize) -> ResultLedger<Transaction> {
        if index >= self.transactions.len() {
            return Err(LedgerError::KeyNotFound(format!(
                "transaction at index {index}"
            )));
        }
        let tx = self.transactions.remove(index);
        tracing::debug!(id = %tx.id, "deleted transaction");
        Ok(tx)
    }

    /// Replays the whole log into a [`BalanceSnapshot`].
    pub fn snapshot(&self) -> BalanceSnapshot {
        let known: HashSet<String> = self.participants.iter().cloned().collect();
        balance::compute(&self.transactions, &known)
    }

    /// Records a shared expense fronted by the ledger owner.
    ///
    /// Runs [`distribute`] first, then appends one [`SplitMain`] for the
    /// full total against the payer wallet, one [`SplitDebit`] per
    /// non-payer share, and one [`SplitShare`] for the payer residual. On
    /// any error nothing is appended.
    ///
    /// [`SplitMain`]: TransactionKind::SplitMain
    /// [`SplitDebit`]: TransactionKind::SplitDebit
    /// [`SplitShare`]: TransactionKind::SplitShare
    pub fn split_expense(
        &mut self,
        total: Amount,
        note: &str,
        source: Source,
        date: DateTime<Utc>,
        participants: &[String],
        manual: &HashMap<String, Amount>,
    ) -> ResultLedger<BalanceSnapshot> {
        for name in participants {
            if name != SELF && !self.participants.contains(name) {
                return Err(LedgerError::KeyNotFound(name.clone()));
            }
        }
        let outcome = split::distribute(total, participants, manual)?;

        tracing::debug!(%total, shares = outcome.shares.len(), "recording split");
        self.transactions.push(split_record(
            TransactionKind::SplitMain,
            date,
            total,
            format!("{note} (total)"),
            source,
            Some(SELF.to_string()),
        ));

        let mut seen = HashSet::new();
        for name in participants {
            if name == SELF || !seen.insert(name.as_str()) {
                continue;
            }
            self.transactions.push(split_record(
                TransactionKind::SplitDebit,
                date,
                outcome.shares[name.as_str()],
                note.to_string(),
                Source::default(),
                Some(name.clone()),
            ));
        }

        self.transactions.push(split_record(
            TransactionKind::SplitShare,
            date,
            outcome.payer_residual,
            format!("{note} (own share)"),
            Source::default(),
            Some(SELF.to_string()),
        ));

        Ok(self.snapshot())
    }

    /// Records a repayment received from a participant (settle up).
    pub fn settle_up(
        &mut self,
        person: &str,
        amount: Amount,
        date: DateTime<Utc>,
    ) -> ResultLedger<BalanceSnapshot> {
        if !self.participants.iter().any(|existing| existing == person) {
            return Err(LedgerError::KeyNotFound(person.to_string()));
        }
        let tx = Transaction::new(
            TransactionKind::Received,
            date,
            amount,
            String::from("Settlement"),
            Some(person.to_string()),
            Source::Cash,
            None,
        )?;
        Ok(self.append(tx))
    }

    /// Records a manual wallet correction.
    pub fn correct_balance(
        &mut self,
        amount: Amount,
        mode: CorrectionMode,
        source: Source,
        date: DateTime<Utc>,
        note: &str,
    ) -> ResultLedger<BalanceSnapshot> {
        let tx = Transaction::correction(date, amount, mode, source, note.to_string())?;
        Ok(self.append(tx))
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds one record of a split.
///
/// Bypasses [`Transaction::new`] because the payer-share amount may be
/// negative when rounding overdraws the remainder; every other amount here
/// was already validated by the distributor.
fn split_record(
    kind: TransactionKind,
    date: DateTime<Utc>,
    amount: Amount,
    note: String,
    source: Source,
    person: Option<String>,
) -> Transaction {
    Transaction {
        id: Uuid::new_v4(),
        date,
        kind,
        amount,
        note,
        person,
        source,
        tag: None,
        mode: None,
        week_reset: false,
    }
}
