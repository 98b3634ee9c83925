//! Shared-expense distribution.
//!
//! Given the total of a shared expense, the selected participants and any
//! manual per-participant amounts, [`distribute`] computes each
//! participant's owed share plus the payer's residual share. The
//! distributor never touches the log; turning an outcome into records is
//! the caller's job (see `Ledger::split_expense`).

use std::collections::{HashMap, HashSet};

use crate::{Amount, LedgerError, ResultLedger, transactions::SELF};

/// The computed allocation of one shared expense.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitOutcome {
    /// Owed share per non-payer participant.
    pub shares: HashMap<String, Amount>,
    /// What the payer keeps as their own share of the expense.
    ///
    /// `total - sum(shares)`. Skewed manual amounts can push this above the
    /// naive per-head share, and rounding can push it below zero.
    pub payer_residual: Amount,
}

/// Allocates `total` across `participants` plus the payer.
///
/// Participants present in `manual` are *assigned* (a manual zero counts);
/// everyone else, the payer included, is *unassigned* and receives an equal
/// rounded share of the remainder. The payer is identified by [`SELF`]: a
/// manual amount under that key assigns the payer, and occurrences of it in
/// `participants` are ignored. The payer always takes part in the
/// allocation pool; it is never special-cased out of the denominator.
///
/// Fails with [`LedgerError::SumExceedsTotal`] when manual amounts alone
/// exceed the total, in which case the caller must not append any records.
pub fn distribute(
    total: Amount,
    participants: &[String],
    manual: &HashMap<String, Amount>,
) -> ResultLedger<SplitOutcome> {
    if !total.is_positive() {
        return Err(LedgerError::InvalidAmount(
            "split total must be > 0".to_string(),
        ));
    }
    for (name, amount) in manual {
        if amount.is_negative() {
            return Err(LedgerError::InvalidAmount(format!(
                "manual amount for {name} must be >= 0"
            )));
        }
    }

    // Participants form an ordered set; drop duplicates and the payer.
    let mut seen = HashSet::new();
    let others: Vec<&String> = participants
        .iter()
        .filter(|name| name.as_str() != SELF && seen.insert(name.as_str()))
        .collect();

    let mut assigned_sum = Amount::ZERO;
    let mut unassigned_count: i64 = 0;
    for name in &others {
        match manual.get(name.as_str()) {
            Some(amount) => assigned_sum += *amount,
            None => unassigned_count += 1,
        }
    }
    match manual.get(SELF) {
        Some(amount) => assigned_sum += *amount,
        None => unassigned_count += 1,
    }

    let remainder = total - assigned_sum;
    if remainder.is_negative() {
        return Err(LedgerError::SumExceedsTotal(format!(
            "assigned {assigned_sum} exceeds total {total}"
        )));
    }

    // Round half away from zero on the quotient. When everyone was assigned
    // manually, any leftover stays with the payer via the residual below.
    let auto_share = if unassigned_count > 0 {
        remainder.div_round(unassigned_count)
    } else {
        Amount::ZERO
    };

    let shares: HashMap<String, Amount> = others
        .iter()
        .map(|name| {
            let share = manual.get(name.as_str()).copied().unwrap_or(auto_share);
            ((*name).clone(), share)
        })
        .collect();

    let owed = shares
        .values()
        .fold(Amount::ZERO, |sum, share| sum + *share);

    Ok(SplitOutcome {
        shares,
        payer_residual: total - owed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people(list: &[&str]) -> Vec<String> {
        list.iter().map(|name| name.to_string()).collect()
    }

    fn manual(list: &[(&str, i64)]) -> HashMap<String, Amount> {
        list.iter()
            .map(|(name, amount)| (name.to_string(), Amount::new(*amount)))
            .collect()
    }

    #[test]
    fn even_split_includes_payer_in_denominator() {
        let outcome =
            distribute(Amount::new(1000), &people(&["Ana", "Bruno"]), &HashMap::new()).unwrap();

        assert_eq!(outcome.shares["Ana"], Amount::new(333));
        assert_eq!(outcome.shares["Bruno"], Amount::new(333));
        assert_eq!(outcome.payer_residual, Amount::new(334));
    }

    #[test]
    fn manual_amounts_take_precedence() {
        let outcome = distribute(
            Amount::new(900),
            &people(&["Ana", "Bruno"]),
            &manual(&[("Ana", 400)]),
        )
        .unwrap();

        assert_eq!(outcome.shares["Ana"], Amount::new(400));
        assert_eq!(outcome.shares["Bruno"], Amount::new(250));
        assert_eq!(outcome.payer_residual, Amount::new(250));
    }

    #[test]
    fn over_assignment_is_rejected() {
        let result = distribute(
            Amount::new(100),
            &people(&["Ana"]),
            &manual(&[("Ana", 150)]),
        );
        assert!(matches!(result, Err(LedgerError::SumExceedsTotal(_))));
    }

    #[test]
    fn manual_zero_counts_as_assigned() {
        let outcome = distribute(
            Amount::new(600),
            &people(&["Ana", "Bruno"]),
            &manual(&[("Ana", 0)]),
        )
        .unwrap();

        // Ana is assigned 0; Bruno and the payer split the remainder.
        assert_eq!(outcome.shares["Ana"], Amount::ZERO);
        assert_eq!(outcome.shares["Bruno"], Amount::new(300));
        assert_eq!(outcome.payer_residual, Amount::new(300));
    }

    #[test]
    fn manual_payer_amount_removes_payer_from_pool() {
        let outcome = distribute(
            Amount::new(900),
            &people(&["Ana", "Bruno"]),
            &manual(&[(SELF, 300)]),
        )
        .unwrap();

        assert_eq!(outcome.shares["Ana"], Amount::new(300));
        assert_eq!(outcome.shares["Bruno"], Amount::new(300));
        assert_eq!(outcome.payer_residual, Amount::new(300));
    }

    #[test]
    fn fully_assigned_leftover_accrues_to_payer() {
        let outcome = distribute(
            Amount::new(1000),
            &people(&["Ana", "Bruno"]),
            &manual(&[("Ana", 300), ("Bruno", 300), (SELF, 300)]),
        )
        .unwrap();

        // 100 left over after all manual amounts: it stays with the payer.
        assert_eq!(outcome.payer_residual, Amount::new(400));
    }

    #[test]
    fn rounding_can_push_the_residual_negative() {
        // Four friends plus the payer over a remainder of 3: everyone gets
        // a rounded 1, leaving the payer with -1.
        let outcome = distribute(
            Amount::new(3),
            &people(&["Ana", "Bruno", "Cleo", "Dian"]),
            &HashMap::new(),
        )
        .unwrap();

        assert_eq!(outcome.shares["Ana"], Amount::new(1));
        assert_eq!(outcome.payer_residual, Amount::new(-1));
    }

    #[test]
    fn duplicate_and_payer_entries_are_ignored() {
        let outcome = distribute(
            Amount::new(1000),
            &people(&["Ana", "Ana", SELF, "Bruno"]),
            &HashMap::new(),
        )
        .unwrap();

        assert_eq!(outcome.shares.len(), 2);
        assert_eq!(outcome.shares["Ana"], Amount::new(333));
        assert_eq!(outcome.payer_residual, Amount::new(334));
    }

    #[test]
    fn non_positive_total_is_rejected() {
        for total in [0, -100] {
            let result = distribute(Amount::new(total), &people(&["Ana"]), &HashMap::new());
            assert!(matches!(result, Err(LedgerError::InvalidAmount(_))));
        }
    }

    #[test]
    fn negative_manual_amount_is_rejected() {
        let result = distribute(
            Amount::new(100),
            &people(&["Ana"]),
            &manual(&[("Ana", -10)]),
        );
        assert!(matches!(result, Err(LedgerError::InvalidAmount(_))));
    }

    #[test]
    fn payer_alone_keeps_the_whole_total() {
        let outcome = distribute(Amount::new(500), &people(&[]), &HashMap::new()).unwrap();
        assert!(outcome.shares.is_empty());
        assert_eq!(outcome.payer_residual, Amount::new(500));
    }
}
