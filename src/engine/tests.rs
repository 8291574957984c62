#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

fn configured(limit: Decimal) -> BudgetState {
    BudgetState {
        budget_limit: Some(limit),
        ..Default::default()
    }
}

fn candidate(description: &str, amount: Decimal, category: Category) -> Candidate {
    Candidate {
        description: description.into(),
        amount,
        category,
    }
}

/// Evaluate a candidate that must be accepted outright.
fn seed(state: &mut BudgetState, description: &str, amount: Decimal, category: Category) {
    match evaluate(state, candidate(description, amount, category)) {
        Decision::Accepted(_) => {}
        other => panic!("Expected accept while seeding, got {other:?}"),
    }
}

// ── Input validation ──────────────────────────────────────────

#[test]
fn test_empty_description_rejected() {
    let mut state = configured(dec!(500));
    let before = state.clone();
    let decision = evaluate(&mut state, candidate("", dec!(10), Category::Other));
    assert_eq!(decision, Decision::Rejected(RejectReason::InvalidInput));
    assert_eq!(state, before);
}

#[test]
fn test_whitespace_description_rejected() {
    let mut state = configured(dec!(500));
    let decision = evaluate(&mut state, candidate("   ", dec!(10), Category::Other));
    assert_eq!(decision, Decision::Rejected(RejectReason::InvalidInput));
    assert!(state.transactions.is_empty());
}

#[test]
fn test_non_positive_amount_rejected() {
    let mut state = configured(dec!(500));
    let before = state.clone();
    for amount in [Decimal::ZERO, dec!(-5)] {
        let decision = evaluate(&mut state, candidate("Lunch", amount, Category::Other));
        assert_eq!(decision, Decision::Rejected(RejectReason::InvalidInput));
    }
    assert_eq!(state, before);
}

#[test]
fn test_unconfigured_state_rejected() {
    let mut state = BudgetState::default();
    let decision = evaluate(&mut state, candidate("Lunch", dec!(10), Category::Other));
    assert_eq!(decision, Decision::Rejected(RejectReason::InvalidInput));
    assert!(state.transactions.is_empty());
}

// ── Accept path ───────────────────────────────────────────────

#[test]
fn test_accept_prepends() {
    let mut state = configured(dec!(500));
    seed(&mut state, "First", dec!(10), Category::Other);
    seed(&mut state, "Second", dec!(20), Category::Groceries);

    assert_eq!(state.transactions.len(), 2);
    assert_eq!(state.transactions[0].description, "Second");
    assert_eq!(state.transactions[1].description, "First");
}

#[test]
fn test_accept_trims_description() {
    let mut state = configured(dec!(500));
    let decision = evaluate(&mut state, candidate("  Lunch  ", dec!(10), Category::Other));
    match decision {
        Decision::Accepted(txn) => assert_eq!(txn.description, "Lunch"),
        other => panic!("Expected accept, got {other:?}"),
    }
}

#[test]
fn test_accept_at_exact_budget() {
    // projected == limit is not "exceeds"; the check is strictly greater
    let mut state = configured(dec!(100));
    seed(&mut state, "A", dec!(90), Category::Other);
    seed(&mut state, "B", dec!(10), Category::Other);
    assert_eq!(report::total_spending(&state.transactions), dec!(100));
}

#[test]
fn test_ids_unique() {
    let mut state = configured(dec!(500));
    for i in 0..5 {
        seed(&mut state, &format!("Txn {i}"), dec!(1), Category::Other);
    }
    let mut ids: Vec<&str> = state.transactions.iter().map(|t| t.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 5);
}

// ── Overall budget ────────────────────────────────────────────

#[test]
fn test_non_exemptible_over_budget_hard_blocked() {
    let mut state = configured(dec!(500));
    seed(&mut state, "Existing", dec!(480), Category::Other);

    let decision = evaluate(&mut state, candidate("Snacks", dec!(30), Category::Other));
    assert_eq!(
        decision,
        Decision::Rejected(RejectReason::BudgetExceeded {
            remaining: dec!(20)
        })
    );
    assert_eq!(state.transactions.len(), 1);
}

#[test]
fn test_exemptible_over_budget_needs_confirmation() {
    let mut state = configured(dec!(500));
    seed(&mut state, "Existing", dec!(480), Category::Other);

    let decision = evaluate(&mut state, candidate("Medicine", dec!(30), Category::Health));
    let pending = match decision {
        Decision::NeedsConfirmation(p) => p,
        other => panic!("Expected confirmation, got {other:?}"),
    };
    assert_eq!(pending.kind, ConfirmKind::OverallBudget);
    assert_eq!(pending.over_by, dec!(10));
    // Not materialized yet
    assert_eq!(state.transactions.len(), 1);

    let txn = commit(&mut state, pending);
    assert_eq!(txn.description, "Medicine");
    assert_eq!(state.transactions.len(), 2);
    assert_eq!(state.transactions[0].id, txn.id);
    assert_eq!(report::total_spending(&state.transactions), dec!(510));
}

#[test]
fn test_discard_is_a_no_op() {
    let mut state = configured(dec!(500));
    seed(&mut state, "Existing", dec!(480), Category::Other);
    let before = state.clone();

    let decision = evaluate(&mut state, candidate("Medicine", dec!(30), Category::Health));
    assert!(matches!(decision, Decision::NeedsConfirmation(_)));
    drop(decision);
    assert_eq!(state, before);
}

// ── Category limits ───────────────────────────────────────────

#[test]
fn test_category_limit_needs_confirmation_despite_headroom() {
    let mut state = configured(dec!(10000));
    set_category_limit(&mut state, Category::Groceries, dec!(100)).unwrap();
    seed(&mut state, "Weekly shop", dec!(90), Category::Groceries);

    let decision = evaluate(&mut state, candidate("Top-up", dec!(20), Category::Groceries));
    let pending = match decision {
        Decision::NeedsConfirmation(p) => p,
        other => panic!("Expected confirmation, got {other:?}"),
    };
    assert_eq!(pending.kind, ConfirmKind::CategoryLimit);
    assert_eq!(pending.over_by, dec!(10));
}

#[test]
fn test_category_limit_takes_precedence_over_budget() {
    // Both limits would trip; the category cap is the narrower constraint
    let mut state = configured(dec!(100));
    set_category_limit(&mut state, Category::Groceries, dec!(50)).unwrap();
    seed(&mut state, "Shop", dec!(45), Category::Groceries);
    seed(&mut state, "Misc", dec!(45), Category::Other);

    let decision = evaluate(&mut state, candidate("More food", dec!(20), Category::Groceries));
    match decision {
        Decision::NeedsConfirmation(p) => assert_eq!(p.kind, ConfirmKind::CategoryLimit),
        other => panic!("Expected CategoryLimit confirmation, got {other:?}"),
    }
}

#[test]
fn test_category_at_exact_limit_accepted() {
    let mut state = configured(dec!(1000));
    set_category_limit(&mut state, Category::Transport, dec!(50)).unwrap();
    seed(&mut state, "Fuel", dec!(30), Category::Transport);
    seed(&mut state, "Bus pass", dec!(20), Category::Transport);
    assert_eq!(
        report::category_spending(&state.transactions, Category::Transport),
        dec!(50)
    );
}

#[test]
fn test_unlimited_category_ignores_other_limits() {
    let mut state = configured(dec!(1000));
    set_category_limit(&mut state, Category::Groceries, dec!(10)).unwrap();
    // Transport has no cap, so a large expense passes on budget alone
    seed(&mut state, "Flight", dec!(500), Category::Transport);
}

// ── Commit semantics ──────────────────────────────────────────

#[test]
fn test_commit_does_not_re_evaluate() {
    let mut state = configured(dec!(500));
    seed(&mut state, "Existing", dec!(480), Category::Other);

    let pending = match evaluate(&mut state, candidate("Medicine", dec!(30), Category::Health)) {
        Decision::NeedsConfirmation(p) => p,
        other => panic!("Expected confirmation, got {other:?}"),
    };

    // State shifts between decision and commit; commit still inserts
    seed(&mut state, "Race", dec!(5), Category::Other);
    commit(&mut state, pending);
    assert_eq!(state.transactions.len(), 3);
    assert_eq!(report::total_spending(&state.transactions), dec!(515));
}

// ── Removal ───────────────────────────────────────────────────

#[test]
fn test_remove_by_id() {
    let mut state = configured(dec!(500));
    seed(&mut state, "Keep", dec!(10), Category::Other);
    seed(&mut state, "Drop", dec!(20), Category::Other);

    let id = state.transactions[0].id.clone();
    remove(&mut state, &id);
    assert_eq!(state.transactions.len(), 1);
    assert_eq!(state.transactions[0].description, "Keep");
}

#[test]
fn test_remove_missing_id_is_idempotent() {
    let mut state = configured(dec!(500));
    seed(&mut state, "Keep", dec!(10), Category::Other);
    let before = state.clone();
    remove(&mut state, "no-such-id");
    assert_eq!(state, before);
}

// ── Budget and limit mutations ────────────────────────────────

#[test]
fn test_set_budget() {
    let mut state = BudgetState::default();
    assert!(set_budget(&mut state, dec!(500)).is_ok());
    assert_eq!(state.budget_limit, Some(dec!(500)));

    assert_eq!(
        set_budget(&mut state, Decimal::ZERO),
        Err(RejectReason::InvalidInput)
    );
    assert_eq!(
        set_budget(&mut state, dec!(-1)),
        Err(RejectReason::InvalidInput)
    );
    assert_eq!(state.budget_limit, Some(dec!(500)));
}

#[test]
fn test_set_budget_preserves_transactions() {
    let mut state = configured(dec!(500));
    seed(&mut state, "Lunch", dec!(10), Category::Other);
    set_budget(&mut state, dec!(800)).unwrap();
    assert_eq!(state.transactions.len(), 1);
    assert_eq!(state.budget_limit, Some(dec!(800)));
}

#[test]
fn test_clear_budget_resets_everything() {
    let mut state = configured(dec!(500));
    seed(&mut state, "Lunch", dec!(10), Category::Other);
    set_category_limit(&mut state, Category::Groceries, dec!(100)).unwrap();

    clear_budget(&mut state);
    assert_eq!(state, BudgetState::default());
}

#[test]
fn test_set_category_limit_overwrites() {
    let mut state = configured(dec!(500));
    set_category_limit(&mut state, Category::Groceries, dec!(100)).unwrap();
    set_category_limit(&mut state, Category::Groceries, dec!(150)).unwrap();
    assert_eq!(state.category_limits.get(&Category::Groceries), Some(&dec!(150)));
}

#[test]
fn test_set_category_limit_rejects_non_positive() {
    let mut state = configured(dec!(500));
    assert_eq!(
        set_category_limit(&mut state, Category::Groceries, Decimal::ZERO),
        Err(RejectReason::InvalidInput)
    );
    assert!(state.category_limits.is_empty());
}

#[test]
fn test_clear_category_limit_idempotent() {
    let mut state = configured(dec!(500));
    set_category_limit(&mut state, Category::Groceries, dec!(100)).unwrap();
    clear_category_limit(&mut state, Category::Groceries);
    assert!(state.category_limits.is_empty());
    // Absent entry is a no-op
    clear_category_limit(&mut state, Category::Groceries);
    assert!(state.category_limits.is_empty());
}

// ── Budget alarm ──────────────────────────────────────────────

#[test]
fn test_alarm_fires_once_per_rising_edge() {
    let mut alarm = BudgetAlarm::default();
    let limit = Some(dec!(100));

    assert!(!alarm.observe(dec!(90), limit));
    // Crossing the limit fires exactly once
    assert!(alarm.observe(dec!(100), limit));
    assert!(!alarm.observe(dec!(105), limit));
    // Dropping below re-arms
    assert!(!alarm.observe(dec!(95), limit));
    assert!(alarm.observe(dec!(100), limit));
}

#[test]
fn test_alarm_never_fires_unconfigured() {
    let mut alarm = BudgetAlarm::default();
    assert!(!alarm.observe(dec!(1000), None));
    assert!(!alarm.observe(dec!(2000), None));
}

#[test]
fn test_alarm_with_engine_flow() {
    let mut state = configured(dec!(100));
    let mut alarm = BudgetAlarm::default();
    seed(&mut state, "Base", dec!(90), Category::Other);
    assert!(!alarm.observe(report::total_spending(&state.transactions), state.budget_limit));

    // Landing exactly on the limit trips the alarm once
    seed(&mut state, "Meds", dec!(10), Category::Health);
    let meds_id = state.transactions[0].id.clone();
    assert_eq!(report::total_spending(&state.transactions), dec!(100));
    assert!(alarm.observe(report::total_spending(&state.transactions), state.budget_limit));

    // Going further over needs confirmation (exemptible) but must not re-fire
    let pending = match evaluate(&mut state, candidate("More", dec!(5), Category::Essential)) {
        Decision::NeedsConfirmation(p) => p,
        other => panic!("Expected confirmation, got {other:?}"),
    };
    commit(&mut state, pending);
    assert!(!alarm.observe(report::total_spending(&state.transactions), state.budget_limit));

    // Drop back to 95: the alarm re-arms
    remove(&mut state, &meds_id);
    assert_eq!(report::total_spending(&state.transactions), dec!(95));
    assert!(!alarm.observe(report::total_spending(&state.transactions), state.budget_limit));

    // Reaching the limit again fires a second time
    seed(&mut state, "Again", dec!(5), Category::Other);
    assert!(alarm.observe(report::total_spending(&state.transactions), state.budget_limit));
}

// ── Reporting ─────────────────────────────────────────────────

#[test]
fn test_remaining_and_percentage() {
    let mut state = configured(dec!(200));
    seed(&mut state, "A", dec!(50), Category::Other);
    assert_eq!(report::remaining(&state), Some(dec!(150)));
    assert_eq!(report::percentage_used(&state), Some(dec!(25)));
}

#[test]
fn test_percentage_guards() {
    let state = BudgetState::default();
    assert_eq!(report::percentage_used(&state), None);
    assert_eq!(report::remaining(&state), None);

    // A zero limit cannot be set through the engine, but the guard holds
    let state = BudgetState {
        budget_limit: Some(Decimal::ZERO),
        ..Default::default()
    };
    assert_eq!(report::percentage_used(&state), None);
}

#[test]
fn test_spending_by_category_sums_to_total() {
    let mut state = configured(dec!(1000));
    seed(&mut state, "A", dec!(10), Category::Groceries);
    seed(&mut state, "B", dec!(20), Category::Groceries);
    seed(&mut state, "C", dec!(5), Category::Health);
    seed(&mut state, "D", dec!(15), Category::Transport);

    let by_category = report::spending_by_category(&state.transactions);
    assert_eq!(by_category.len(), 3);
    assert_eq!(by_category.get(&Category::Groceries), Some(&dec!(30)));
    assert!(!by_category.contains_key(&Category::Other));

    let combined: Decimal = by_category.values().copied().sum();
    assert_eq!(combined, report::total_spending(&state.transactions));
}

#[test]
fn test_spending_by_category_empty() {
    assert!(report::spending_by_category(&[]).is_empty());
    assert_eq!(report::total_spending(&[]), Decimal::ZERO);
}
