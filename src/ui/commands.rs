use std::collections::HashMap;
use std::sync::LazyLock;

use super::app::{App, InputMode, PendingAction, Screen};
use crate::engine;
use crate::models::Category;
use crate::store::Store;
use crate::ui::util::{format_amount, parse_amount};

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &Store) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit spendguard", cmd_quit, r);
    register_command!("quit", "Quit spendguard", cmd_quit, r);
    register_command!("o", "Go to Overview", cmd_overview, r);
    register_command!("overview", "Go to Overview", cmd_overview, r);
    register_command!("e", "Go to Expenses", cmd_expenses, r);
    register_command!("expenses", "Go to Expenses", cmd_expenses, r);
    register_command!("l", "Go to Limits", cmd_limits, r);
    register_command!("limits", "Go to Limits", cmd_limits, r);
    register_command!("a", "Open the add-expense form", cmd_add, r);
    register_command!("add", "Open the add-expense form", cmd_add, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "budget",
        "Set the overall budget (e.g. :budget 500)",
        cmd_budget,
        r
    );
    register_command!(
        "limit",
        "Cap a category (e.g. :limit Groceries 100)",
        cmd_limit,
        r
    );
    register_command!(
        "unlimit",
        "Drop a category cap (e.g. :unlimit Groceries)",
        cmd_unlimit,
        r
    );
    register_command!(
        "delete",
        "Delete the selected expense",
        cmd_delete,
        r
    );
    register_command!(
        "reset",
        "Clear the budget and all expenses",
        cmd_reset,
        r
    );

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, store: &Store) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, store)
    } else {
        if !cmd_name.is_empty() {
            app.set_status(format!("Unknown command: {cmd_name} (:help for a list)"));
        }
        Ok(())
    }
}

/// Save the current document; on failure keep the in-memory mutation and
/// surface the error in the status bar so the user can retry the save.
pub(crate) fn persist(app: &mut App, store: &Store) {
    if let Err(e) = store.save_state(&app.identity, &app.state) {
        app.set_status(format!("Save failed (changes kept in memory): {e}"));
    }
}

// ── Command handlers ─────────────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _store: &Store) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_overview(_args: &str, app: &mut App, _store: &Store) -> anyhow::Result<()> {
    app.screen = Screen::Overview;
    Ok(())
}

fn cmd_expenses(_args: &str, app: &mut App, _store: &Store) -> anyhow::Result<()> {
    app.screen = Screen::Expenses;
    Ok(())
}

fn cmd_limits(_args: &str, app: &mut App, _store: &Store) -> anyhow::Result<()> {
    app.screen = Screen::Limits;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _store: &Store) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_add(_args: &str, app: &mut App, _store: &Store) -> anyhow::Result<()> {
    if app.state.is_configured() {
        app.reset_form();
        app.input_mode = InputMode::AddExpense;
    } else {
        app.input_mode = InputMode::SetupBudget;
    }
    Ok(())
}

fn cmd_budget(args: &str, app: &mut App, store: &Store) -> anyhow::Result<()> {
    let Some(amount) = parse_amount(args) else {
        app.set_status("Usage: :budget <positive amount>");
        return Ok(());
    };
    if engine::set_budget(&mut app.state, amount).is_ok() {
        persist(app, store);
        app.set_status(format!("Budget set to {}", format_amount(amount)));
        // Lowering the budget below current spending can trip the alarm
        app.check_budget_alarm();
    }
    Ok(())
}

fn cmd_limit(args: &str, app: &mut App, store: &Store) -> anyhow::Result<()> {
    let mut parts = args.split_whitespace();
    let (Some(name), Some(raw)) = (parts.next(), parts.next()) else {
        app.set_status("Usage: :limit <category> <positive amount>");
        return Ok(());
    };
    let Some(category) = Category::parse(name) else {
        app.set_status(format!("Unknown category: {name}"));
        return Ok(());
    };
    let Some(amount) = parse_amount(raw) else {
        app.set_status("Limit must be a positive amount");
        return Ok(());
    };
    if engine::set_category_limit(&mut app.state, category, amount).is_ok() {
        persist(app, store);
        app.set_status(format!("{category} capped at {}", format_amount(amount)));
    }
    Ok(())
}

fn cmd_unlimit(args: &str, app: &mut App, store: &Store) -> anyhow::Result<()> {
    let Some(category) = Category::parse(args) else {
        app.set_status("Usage: :unlimit <category>");
        return Ok(());
    };
    engine::clear_category_limit(&mut app.state, category);
    persist(app, store);
    app.set_status(format!("Removed the {category} cap"));
    Ok(())
}

fn cmd_delete(_args: &str, app: &mut App, _store: &Store) -> anyhow::Result<()> {
    if app.screen != Screen::Expenses {
        app.screen = Screen::Expenses;
    }
    let Some(txn) = app.selected_transaction() else {
        app.set_status("No expense selected");
        return Ok(());
    };
    let (id, description) = (txn.id.clone(), txn.description.clone());
    app.confirm_message = format!("Delete '{}'?", description);
    app.pending_action = Some(PendingAction::DeleteTransaction { id, description });
    app.input_mode = InputMode::Confirm;
    Ok(())
}

fn cmd_reset(_args: &str, app: &mut App, _store: &Store) -> anyhow::Result<()> {
    app.confirm_message = "Clear the budget and delete all expenses?".into();
    app.pending_action = Some(PendingAction::ResetBudget);
    app.input_mode = InputMode::Confirm;
    Ok(())
}
