//! Snapshot derivation.
//!
//! [`compute`] replays the whole transaction log, in log order, starting
//! from all-zero accumulators. There is no persisted running balance that
//! could drift from the log: callers take a fresh snapshot after every
//! append or delete, and recomputation is idempotent.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{
    Amount, Source, Transaction,
    transactions::{CorrectionMode, SELF, TransactionKind},
};

/// The complete derived balance state at a point in time.
///
/// Sign convention for `per_person`: positive means the participant owes
/// the user, negative means the user owes the participant.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub cash: Amount,
    pub bank: Amount,
    pub weekly_spend: Amount,
    pub per_person: HashMap<String, Amount>,
}

impl BalanceSnapshot {
    fn wallet_mut(&mut self, source: Source) -> &mut Amount {
        match source {
            Source::Cash => &mut self.cash,
            Source::Bank => &mut self.bank,
        }
    }

    /// Shifts a known counterparty's net balance.
    ///
    /// Records attributed to nobody or to the owner are skipped, and so are
    /// names missing from the map: a participant removed after the record
    /// was written must not break replay (and must not resurface in the
    /// result).
    fn shift_person(&mut self, person: Option<&str>, delta: Amount) {
        let Some(name) = person else { return };
        if name == SELF {
            return;
        }
        match self.per_person.get_mut(name) {
            Some(balance) => *balance += delta,
            None => tracing::warn!(person = name, "skipping unknown participant in replay"),
        }
    }
}

/// Folds the transaction log into a [`BalanceSnapshot`].
///
/// Pure function: same log and participant set always yield the same
/// snapshot, and nothing is clamped, so wallets and per-person balances may
/// legitimately go negative.
pub fn compute(transactions: &[Transaction], participants: &HashSet<String>) -> BalanceSnapshot {
    let mut snapshot = BalanceSnapshot {
        per_person: participants
            .iter()
            .filter(|name| name.as_str() != SELF)
            .map(|name| (name.clone(), Amount::ZERO))
            .collect(),
        ..BalanceSnapshot::default()
    };

    for tx in transactions {
        let amount = tx.amount;
        match tx.kind {
            TransactionKind::Expense => {
                *snapshot.wallet_mut(tx.source) -= amount;
                if !tx.week_reset {
                    snapshot.weekly_spend += amount;
                }
                // A counterparty on an expense either owes more, or this
                // pays down what the user owed them.
                snapshot.shift_person(tx.person.as_deref(), amount);
            }
            TransactionKind::TransferIn | TransactionKind::Received => {
                *snapshot.wallet_mut(tx.source) += amount;
                snapshot.shift_person(tx.person.as_deref(), -amount);
            }
            TransactionKind::TransferOut => {
                *snapshot.wallet_mut(tx.source) -= amount;
                snapshot.shift_person(tx.person.as_deref(), amount);
            }
            TransactionKind::SplitMain => {
                *snapshot.wallet_mut(tx.source) -= amount;
            }
            TransactionKind::SplitShare => {
                if !tx.week_reset {
                    snapshot.weekly_spend += amount;
                }
            }
            TransactionKind::SplitDebit => {
                snapshot.shift_person(tx.person.as_deref(), amount);
            }
            TransactionKind::Correction => match tx.mode {
                Some(CorrectionMode::In) => *snapshot.wallet_mut(tx.source) += amount,
                Some(CorrectionMode::Out) => *snapshot.wallet_mut(tx.source) -= amount,
                None => {
                    tracing::warn!(id = %tx.id, "skipping correction without a mode")
                }
            },
        }
    }

    snapshot
}
