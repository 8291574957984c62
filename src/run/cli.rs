use anyhow::{Context, Result};

use crate::engine::{self, report, BudgetAlarm, Candidate, ConfirmKind, Decision, RejectReason};
use crate::models::{BudgetState, Category};
use crate::session::Identity;
use crate::store::Store;
use crate::ui::util::{format_amount, parse_amount};

pub(crate) fn as_cli(
    args: &[String],
    identity: &Identity,
    mut state: BudgetState,
    store: &Store,
) -> Result<()> {
    match args[1].as_str() {
        "budget" => cli_budget(&args[2..], identity, &mut state, store),
        "add" => cli_add(&args[2..], identity, &mut state, store),
        "remove" | "rm" => cli_remove(&args[2..], identity, &mut state, store),
        "limit" => cli_limit(&args[2..], identity, &mut state, store),
        "unlimit" => cli_unlimit(&args[2..], identity, &mut state, store),
        "summary" | "s" => cli_summary(identity, &state),
        "list" | "ls" => cli_list(&state),
        "reset" => cli_reset(identity, &mut state, store),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("spendguard {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("SpendGuard — budget-first expense tracker");
    println!();
    println!("Usage: spendguard [--profile <name>] [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch interactive TUI");
    println!("  budget <amount>               Set the overall budget");
    println!("  add <desc> <amount> <cat>     Record an expense");
    println!("    --yes, -y                   Confirm a limit overrun without asking");
    println!("  remove <id>                   Delete an expense by id");
    println!("  limit <category> <amount>     Cap a category's spending");
    println!("  unlimit <category>            Drop a category cap");
    println!("  summary, s                    Print budget summary");
    println!("  list, ls                      List recorded expenses");
    println!("  reset                         Clear the budget and all expenses");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
    println!();
    println!("Categories:");
    for category in Category::all() {
        let tag = if category.is_exemptible() {
            " (essential)"
        } else {
            ""
        };
        println!("  {category}{tag}");
    }
}

fn save(identity: &Identity, state: &BudgetState, store: &Store) -> Result<()> {
    store
        .save_state(identity, state)
        .context("Failed to save budget document (change not persisted)")?;
    Ok(())
}

fn cli_budget(
    args: &[String],
    identity: &Identity,
    state: &mut BudgetState,
    store: &Store,
) -> Result<()> {
    let Some(amount) = args.first().and_then(|a| parse_amount(a)) else {
        anyhow::bail!("Usage: spendguard budget <positive amount>");
    };
    engine::set_budget(state, amount)
        .map_err(|_| anyhow::anyhow!("Budget must be a positive amount"))?;
    save(identity, state, store)?;
    println!("Budget set to {}", format_amount(amount));
    Ok(())
}

fn cli_add(
    args: &[String],
    identity: &Identity,
    state: &mut BudgetState,
    store: &Store,
) -> Result<()> {
    if !state.is_configured() {
        anyhow::bail!("No budget set. Run `spendguard budget <amount>` first");
    }

    let confirmed = args.iter().any(|a| a == "--yes" || a == "-y");
    let positional: Vec<&String> = args.iter().filter(|a| !a.starts_with('-')).collect();
    let [description, raw_amount, raw_category] = positional.as_slice() else {
        anyhow::bail!("Usage: spendguard add <description> <amount> <category> [--yes]");
    };

    let Some(amount) = parse_amount(raw_amount) else {
        anyhow::bail!("Amount must be a positive number");
    };
    let Some(category) = Category::parse(raw_category) else {
        anyhow::bail!("Unknown category: {raw_category} (see `spendguard --help`)");
    };

    // Arm the alarm against spending as it stood before this command, so
    // the notice fires only when this expense crosses the budget line.
    let mut alarm = BudgetAlarm::default();
    alarm.observe(
        report::total_spending(&state.transactions),
        state.budget_limit,
    );

    let candidate = Candidate {
        description: (*description).clone(),
        amount,
        category,
    };

    let txn = match engine::evaluate(state, candidate) {
        Decision::Accepted(txn) => txn,
        Decision::NeedsConfirmation(pending) => {
            if !confirmed {
                let warning = match pending.kind {
                    ConfirmKind::CategoryLimit => format!(
                        "this {} expense goes {} over its cap",
                        pending.candidate.category,
                        format_amount(pending.over_by)
                    ),
                    ConfirmKind::OverallBudget => format!(
                        "this {} expense exceeds your budget by {}",
                        pending.candidate.category,
                        format_amount(pending.over_by)
                    ),
                };
                anyhow::bail!("Not recorded: {warning}. Re-run with --yes to record it anyway");
            }
            engine::commit(state, pending)
        }
        Decision::Rejected(RejectReason::InvalidInput) => {
            anyhow::bail!("Enter a valid description and amount");
        }
        Decision::Rejected(RejectReason::BudgetExceeded { remaining }) => {
            anyhow::bail!(
                "Cannot add this expense: it would exceed your budget ({} remaining)",
                format_amount(remaining)
            );
        }
    };

    save(identity, state, store)?;
    println!(
        "Added: {} ({}) [{}] id={}",
        txn.description,
        format_amount(txn.amount),
        txn.category,
        txn.id
    );

    let total = report::total_spending(&state.transactions);
    if alarm.observe(total, state.budget_limit) {
        if let Some(limit) = state.budget_limit {
            println!(
                "⚠ Budget limit reached: spent {} of {}",
                format_amount(total),
                format_amount(limit)
            );
        }
    }
    Ok(())
}

fn cli_remove(
    args: &[String],
    identity: &Identity,
    state: &mut BudgetState,
    store: &Store,
) -> Result<()> {
    let Some(id) = args.first() else {
        anyhow::bail!("Usage: spendguard remove <id>");
    };
    let before = state.transactions.len();
    engine::remove(state, id);
    if state.transactions.len() == before {
        println!("No expense with id {id}");
        return Ok(());
    }
    save(identity, state, store)?;
    println!("Deleted expense {id}");
    Ok(())
}

fn cli_limit(
    args: &[String],
    identity: &Identity,
    state: &mut BudgetState,
    store: &Store,
) -> Result<()> {
    let (Some(name), Some(raw)) = (args.first(), args.get(1)) else {
        anyhow::bail!("Usage: spendguard limit <category> <positive amount>");
    };
    let Some(category) = Category::parse(name) else {
        anyhow::bail!("Unknown category: {name} (see `spendguard --help`)");
    };
    let Some(amount) = parse_amount(raw) else {
        anyhow::bail!("Limit must be a positive amount");
    };
    engine::set_category_limit(state, category, amount)
        .map_err(|_| anyhow::anyhow!("Limit must be a positive amount"))?;
    save(identity, state, store)?;
    println!("{category} capped at {}", format_amount(amount));
    Ok(())
}

fn cli_unlimit(
    args: &[String],
    identity: &Identity,
    state: &mut BudgetState,
    store: &Store,
) -> Result<()> {
    let Some(category) = args.first().and_then(|a| Category::parse(a)) else {
        anyhow::bail!("Usage: spendguard unlimit <category>");
    };
    engine::clear_category_limit(state, category);
    save(identity, state, store)?;
    println!("Removed the {category} cap");
    Ok(())
}

fn cli_summary(identity: &Identity, state: &BudgetState) -> Result<()> {
    println!("SpendGuard — {identity}");
    println!("{}", "─".repeat(40));

    let Some(limit) = state.budget_limit else {
        println!("  No budget set. Run `spendguard budget <amount>`");
        return Ok(());
    };

    let total = report::total_spending(&state.transactions);
    println!("  Budget:     {}", format_amount(limit));
    println!("  Spent:      {}", format_amount(total));
    if let Some(remaining) = report::remaining(state) {
        println!("  Remaining:  {}", format_amount(remaining));
    }
    if let Some(pct) = report::percentage_used(state) {
        println!("  Used:       {pct:.1}%");
    }
    println!("  Expenses:   {}", state.transactions.len());

    let spending = report::spending_by_category(&state.transactions);
    if !spending.is_empty() {
        println!();
        println!("Spending by Category:");
        for (category, amount) in &spending {
            let cap = state
                .category_limits
                .get(category)
                .map(|c| format!("  (cap {})", format_amount(*c)))
                .unwrap_or_default();
            println!(
                "  {:<16} {}{cap}",
                category.as_str(),
                format_amount(*amount)
            );
        }
    }
    Ok(())
}

fn cli_list(state: &BudgetState) -> Result<()> {
    if state.transactions.is_empty() {
        println!("No expenses recorded");
        return Ok(());
    }

    println!(
        "{:<14} {:<14} {:<26} {:<12} Amount",
        "ID", "When", "Description", "Category"
    );
    println!("{}", "─".repeat(78));
    for txn in &state.transactions {
        println!(
            "{:<14} {:<14} {:<26} {:<12} {}",
            txn.id,
            txn.created_at,
            txn.description,
            txn.category.as_str(),
            format_amount(txn.amount)
        );
    }
    Ok(())
}

fn cli_reset(identity: &Identity, state: &mut BudgetState, store: &Store) -> Result<()> {
    engine::clear_budget(state);
    store
        .delete_state(identity)
        .context("Failed to delete the budget document")?;
    println!("Budget cleared");
    Ok(())
}
