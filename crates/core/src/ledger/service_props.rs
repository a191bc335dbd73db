//! Property tests for the ledger service.
//!
//! These drive random operation sequences through `LedgerService` the way
//! the repository would (apply on success, drop on failure) and check the
//! ledger invariants hold at every step.

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;

use adnexus_shared::types::{AccountId, LedgerEntryId};

use super::entry::{EntryKind, LedgerEntry};
use super::service::LedgerService;

/// One requested mutation, before validation.
#[derive(Debug, Clone)]
enum Op {
    Credit(Decimal, EntryKind),
    Debit(Decimal),
    Adjust(Decimal),
}

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    // Cents in [-500.00, 500.00]; includes invalid zero and negative inputs
    // so validation paths get exercised too.
    (-50_000i64..=50_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn kind_strategy() -> impl Strategy<Value = EntryKind> {
    prop_oneof![
        Just(EntryKind::Deposit),
        Just(EntryKind::Spend),
        Just(EntryKind::Refund),
        Just(EntryKind::AdminAdjustment),
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (amount_strategy(), kind_strategy()).prop_map(|(a, k)| Op::Credit(a, k)),
        amount_strategy().prop_map(Op::Debit),
        amount_strategy().prop_map(Op::Adjust),
    ]
}

/// Applies an operation the way the repository does: persist the prepared
/// entry and the new balance together, or nothing at all.
fn apply(op: &Op, account_id: AccountId, entries: &mut Vec<LedgerEntry>, balance: &mut Decimal) {
    let prepared = match op {
        Op::Credit(amount, kind) => {
            LedgerService::prepare_credit(account_id, *balance, *amount, "prop credit", *kind)
        }
        Op::Debit(amount) => {
            LedgerService::prepare_debit(account_id, *balance, *amount, "prop debit")
        }
        Op::Adjust(amount) => {
            LedgerService::prepare_adjustment(account_id, *balance, *amount, "prop adjust")
        }
    };

    if let Ok(prepared) = prepared {
        entries.push(LedgerEntry {
            id: LedgerEntryId::new(),
            account_id,
            amount: prepared.entry.amount,
            kind: prepared.entry.kind,
            description: prepared.entry.description,
            created_at: Utc::now(),
        });
        *balance = prepared.balance_after;
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// After any operation sequence the stored balance equals the sum of
    /// entry amounts, and reconciliation agrees.
    #[test]
    fn prop_balance_equals_entry_sum(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let account_id = AccountId::new();
        let mut entries = Vec::new();
        let mut balance = Decimal::ZERO;

        for op in &ops {
            apply(op, account_id, &mut entries, &mut balance);
            prop_assert_eq!(LedgerService::ledger_total(&entries), balance);
            prop_assert!(LedgerService::reconcile(&entries, balance).is_ok());
        }
    }

    /// The balance never goes negative, no matter what sequence of credits,
    /// debits, and adjustments is attempted.
    #[test]
    fn prop_balance_never_negative(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let account_id = AccountId::new();
        let mut entries = Vec::new();
        let mut balance = Decimal::ZERO;

        for op in &ops {
            apply(op, account_id, &mut entries, &mut balance);
            prop_assert!(balance >= Decimal::ZERO, "balance went negative: {}", balance);
        }
    }

    /// A rejected operation leaves both the balance and the entry history
    /// untouched.
    #[test]
    fn prop_failed_op_has_no_effect(
        start_cents in 0i64..=10_000,
        overdraw_cents in 1i64..=10_000,
    ) {
        let account_id = AccountId::new();
        let balance = Decimal::new(start_cents, 2);
        let requested = balance + Decimal::new(overdraw_cents, 2);

        let result = LedgerService::prepare_debit(account_id, balance, requested, "overdraw");
        prop_assert!(result.is_err());
        // Nothing was prepared, so the repository would write nothing.
    }

    /// Zero entries are impossible: every prepared entry has a non-zero
    /// amount.
    #[test]
    fn prop_no_zero_entries(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let account_id = AccountId::new();
        let mut entries = Vec::new();
        let mut balance = Decimal::ZERO;

        for op in &ops {
            apply(op, account_id, &mut entries, &mut balance);
        }

        prop_assert!(entries.iter().all(|e| e.amount != Decimal::ZERO));
    }
}
