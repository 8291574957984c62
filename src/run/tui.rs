use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::engine::{self, Candidate, ConfirmKind, Decision, RejectReason};
use crate::models::{BudgetState, Category};
use crate::session::Identity;
use crate::store::Store;
use crate::ui::app::{App, FormField, InputMode, PendingAction, Screen};
use crate::ui::commands::{self, persist};
use crate::ui::util::{clamp_scroll, format_amount, parse_amount};

pub(crate) fn as_tui(identity: &Identity, state: BudgetState, store: &Store) -> Result<()> {
    let mut app = App::new(identity.clone(), state);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, store);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    store: &Store,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            // tab row + status + command bar + table chrome
            let content_height = f.area().height.saturating_sub(6) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app, store)?,
                InputMode::Command => handle_command_input(key, app, store)?,
                InputMode::AddExpense => handle_add_input(key, app, store),
                InputMode::SetupBudget => handle_setup_input(key, app, store),
                InputMode::Confirm => handle_confirm_input(key, app, store),
            }
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: event::KeyEvent, app: &mut App, store: &Store) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
        }
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char('1') => app.screen = Screen::Overview,
        KeyCode::Char('2') => app.screen = Screen::Expenses,
        KeyCode::Char('3') => app.screen = Screen::Limits,
        KeyCode::Tab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            app.screen = screens[(idx + 1) % screens.len()];
        }
        KeyCode::BackTab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            app.screen = screens[if idx == 0 { screens.len() - 1 } else { idx - 1 }];
        }
        KeyCode::Char('a') => {
            commands::handle_command("add", app, store)?;
        }
        KeyCode::Char('D') if app.screen == Screen::Expenses => {
            commands::handle_command("delete", app, store)?;
        }
        KeyCode::Char('u') if app.screen == Screen::Limits => {
            let category = app.selected_limit_category();
            if app.state.category_limits.contains_key(&category) {
                engine::clear_category_limit(&mut app.state, category);
                persist(app, store);
                app.set_status(format!("Removed the {category} cap"));
            } else {
                app.set_status(format!("{category} has no cap"));
            }
        }
        KeyCode::Char('g') => match app.screen {
            Screen::Expenses => {
                app.expense_index = 0;
                app.expense_scroll = 0;
            }
            Screen::Limits => app.limit_index = 0,
            Screen::Overview => {}
        },
        KeyCode::Char('G') => match app.screen {
            Screen::Expenses if !app.state.transactions.is_empty() => {
                app.expense_index = app.state.transactions.len() - 1;
                clamp_scroll(app.expense_index, &mut app.expense_scroll, app.visible_rows);
            }
            Screen::Limits => app.limit_index = Category::all().len() - 1,
            _ => {}
        },
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Esc => {
            app.status_message.clear();
        }
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: event::KeyEvent, app: &mut App, store: &Store) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, store)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_setup_input(key: event::KeyEvent, app: &mut App, store: &Store) {
    match key.code {
        KeyCode::Enter => {
            let Some(amount) = parse_amount(&app.budget_input) else {
                app.set_status("Enter a valid budget amount");
                return;
            };
            if engine::set_budget(&mut app.state, amount).is_ok() {
                app.budget_input.clear();
                app.input_mode = InputMode::Normal;
                persist(app, store);
                app.set_status(format!("Budget set to {}", format_amount(amount)));
            }
        }
        KeyCode::Esc => {
            // The modal only dismisses once a budget exists
            if app.state.is_configured() {
                app.budget_input.clear();
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
        }
        KeyCode::Backspace => {
            app.budget_input.pop();
        }
        KeyCode::Char(c) => {
            app.budget_input.push(c);
        }
        _ => {}
    }
}

fn handle_add_input(key: event::KeyEvent, app: &mut App, store: &Store) {
    match key.code {
        KeyCode::Esc => {
            app.reset_form();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => submit_expense(app, store),
        KeyCode::Tab | KeyCode::Down => app.form_field = app.form_field.next(),
        KeyCode::BackTab | KeyCode::Up => app.form_field = app.form_field.prev(),
        KeyCode::Left if app.form_field == FormField::Category => app.cycle_form_category(-1),
        KeyCode::Right if app.form_field == FormField::Category => app.cycle_form_category(1),
        KeyCode::Backspace => match app.form_field {
            FormField::Description => {
                app.form_description.pop();
            }
            FormField::Amount => {
                app.form_amount.pop();
            }
            FormField::Category => {}
        },
        KeyCode::Char(c) => match app.form_field {
            FormField::Description => app.form_description.push(c),
            FormField::Amount => app.form_amount.push(c),
            FormField::Category => {}
        },
        _ => {}
    }
}

fn submit_expense(app: &mut App, store: &Store) {
    let Some(amount) = parse_amount(&app.form_amount) else {
        app.set_status("Enter a valid description and amount");
        return;
    };
    let candidate = Candidate {
        description: app.form_description.clone(),
        amount,
        category: app.form_category(),
    };

    match engine::evaluate(&mut app.state, candidate) {
        Decision::Accepted(txn) => {
            let message = format!("Added: {} ({})", txn.description, format_amount(txn.amount));
            app.reset_form();
            app.input_mode = InputMode::Normal;
            app.expense_index = 0;
            app.expense_scroll = 0;
            persist(app, store);
            app.set_status(message);
            app.check_budget_alarm();
        }
        Decision::NeedsConfirmation(pending) => {
            app.confirm_message = match pending.kind {
                ConfirmKind::CategoryLimit => format!(
                    "This {} expense goes {} over its cap. Record anyway?",
                    pending.candidate.category,
                    format_amount(pending.over_by)
                ),
                ConfirmKind::OverallBudget => format!(
                    "This {} expense exceeds your budget by {}. Record anyway?",
                    pending.candidate.category,
                    format_amount(pending.over_by)
                ),
            };
            app.pending_action = Some(PendingAction::CommitExpense(pending));
            app.input_mode = InputMode::Confirm;
        }
        Decision::Rejected(RejectReason::InvalidInput) => {
            app.set_status("Enter a valid description and amount");
        }
        Decision::Rejected(RejectReason::BudgetExceeded { remaining }) => {
            app.set_status(format!(
                "Cannot add this expense: it would exceed your budget ({} remaining)",
                format_amount(remaining)
            ));
        }
    }
}

fn handle_confirm_input(key: event::KeyEvent, app: &mut App, store: &Store) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            let action = app.pending_action.take();
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
            match action {
                Some(PendingAction::CommitExpense(pending)) => {
                    let txn = engine::commit(&mut app.state, pending);
                    let message =
                        format!("Added: {} ({})", txn.description, format_amount(txn.amount));
                    app.reset_form();
                    app.expense_index = 0;
                    app.expense_scroll = 0;
                    persist(app, store);
                    app.set_status(message);
                    app.check_budget_alarm();
                }
                Some(PendingAction::DeleteTransaction { id, description }) => {
                    engine::remove(&mut app.state, &id);
                    app.clamp_expense_cursor();
                    persist(app, store);
                    app.set_status(format!("Deleted: {description}"));
                    // Dropping back under the limit re-arms the alarm
                    app.check_budget_alarm();
                }
                Some(PendingAction::ResetBudget) => {
                    engine::clear_budget(&mut app.state);
                    app.expense_index = 0;
                    app.expense_scroll = 0;
                    app.check_budget_alarm();
                    if let Err(e) = store.delete_state(&app.identity) {
                        app.set_status(format!("Reset failed to persist: {e}"));
                    } else {
                        app.set_status("Budget cleared");
                    }
                    app.input_mode = InputMode::SetupBudget;
                }
                None => {}
            }
        }
        _ => {
            // Anything else cancels; a held expense goes back to the form
            let back_to_form = matches!(
                app.pending_action.take(),
                Some(PendingAction::CommitExpense(_))
            );
            app.input_mode = if back_to_form {
                InputMode::AddExpense
            } else {
                InputMode::Normal
            };
            app.confirm_message.clear();
            app.set_status("Cancelled");
        }
    }
}

// ── Navigation ───────────────────────────────────────────────

fn handle_move_down(app: &mut App) {
    match app.screen {
        Screen::Expenses => {
            if app.expense_index + 1 < app.state.transactions.len() {
                app.expense_index += 1;
                clamp_scroll(app.expense_index, &mut app.expense_scroll, app.visible_rows);
            }
        }
        Screen::Limits => {
            if app.limit_index + 1 < Category::all().len() {
                app.limit_index += 1;
            }
        }
        Screen::Overview => {}
    }
}

fn handle_move_up(app: &mut App) {
    match app.screen {
        Screen::Expenses => {
            app.expense_index = app.expense_index.saturating_sub(1);
            clamp_scroll(app.expense_index, &mut app.expense_scroll, app.visible_rows);
        }
        Screen::Limits => {
            app.limit_index = app.limit_index.saturating_sub(1);
        }
        Screen::Overview => {}
    }
}
