use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, Tabs},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::app::{App, FormField, InputMode, Screen};
use super::commands;
use super::theme;
use super::util::{format_amount, truncate};
use crate::engine::report;
use crate::models::Category;

pub(crate) fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(5),    // Main content
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Command bar
        ])
        .split(f.area());

    render_tab_bar(f, chunks[0], app);
    match app.screen {
        Screen::Overview => render_overview(f, chunks[1], app),
        Screen::Expenses => render_expenses(f, chunks[1], app),
        Screen::Limits => render_limits(f, chunks[1], app),
    }
    render_status_bar(f, chunks[2], app);
    render_command_bar(f, chunks[3], app);

    match app.input_mode {
        InputMode::SetupBudget => render_setup_popup(f, f.area(), app),
        InputMode::AddExpense => render_add_popup(f, f.area(), app),
        _ => {}
    }

    if app.show_help {
        render_help_overlay(f, f.area());
    }
}

fn render_tab_bar(f: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = Screen::all()
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let num = format!("{}", i + 1);
            if *s == app.screen {
                Line::from(vec![
                    Span::styled(format!("{num}:"), Style::default().fg(theme::TEXT_DIM)),
                    Span::styled(
                        format!("{s}"),
                        Style::default()
                            .fg(theme::ACCENT)
                            .add_modifier(Modifier::BOLD),
                    ),
                ])
            } else {
                Line::from(Span::styled(
                    format!("{num}:{s}"),
                    Style::default().fg(theme::TEXT_DIM),
                ))
            }
        })
        .collect();

    let tabs = Tabs::new(titles)
        .divider(Span::styled(" | ", Style::default().fg(theme::OVERLAY)))
        .style(Style::default().bg(theme::HEADER_BG));

    f.render_widget(tabs, area);
}

// ── Overview ─────────────────────────────────────────────────

fn render_overview(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Figures
            Constraint::Length(3), // Gauge
            Constraint::Min(3),    // Per-category breakdown
        ])
        .split(area);

    let total = report::total_spending(&app.state.transactions);
    let limit = app.state.budget_limit;
    let remaining = report::remaining(&app.state);

    let spent_style = match limit {
        Some(l) if total >= l => theme::over_style(),
        _ => theme::ok_style(),
    };
    let remaining_style = match remaining {
        Some(r) if r > Decimal::ZERO => theme::ok_style(),
        Some(_) => theme::over_style(),
        None => theme::dim_style(),
    };

    let budget_text = limit.map_or("not set".to_string(), format_amount);
    let remaining_text = remaining.map_or("—".to_string(), format_amount);

    let figures = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("  Budget:    ", theme::dim_style()),
            Span::styled(budget_text, theme::normal_style().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("  Spent:     ", theme::dim_style()),
            Span::styled(format_amount(total), spent_style.add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("  Remaining: ", theme::dim_style()),
            Span::styled(remaining_text, remaining_style.add_modifier(Modifier::BOLD)),
        ]),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Budget Overview — {} ", app.identity))
            .border_style(Style::default().fg(theme::OVERLAY)),
    );
    f.render_widget(figures, chunks[0]);

    let percent = report::percentage_used(&app.state)
        .and_then(|p| p.round().to_u64())
        .unwrap_or(0);
    let shown = percent.min(100) as u16;
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::OVERLAY)),
        )
        .gauge_style(Style::default().fg(theme::usage_color(shown)))
        .percent(shown)
        .label(format!("{percent}% of budget used"));
    f.render_widget(gauge, chunks[1]);

    render_breakdown(f, chunks[2], app);
}

fn render_breakdown(f: &mut Frame, area: Rect, app: &App) {
    let by_category = report::spending_by_category(&app.state.transactions);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Spending by Category ")
        .border_style(Style::default().fg(theme::OVERLAY));

    if by_category.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "  No expenses yet. Press a to add one.",
            theme::dim_style(),
        ))
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let rows: Vec<Row> = by_category
        .iter()
        .map(|(category, spent)| {
            let cap = app.state.category_limits.get(category);
            let limit_text = cap.map_or("—".to_string(), |l| format_amount(*l));
            let spent_style = match cap {
                Some(l) if spent >= l => theme::over_style(),
                _ => theme::normal_style(),
            };
            Row::new(vec![
                Cell::from(category.as_str()).style(category_style(*category)),
                Cell::from(format_amount(*spent)).style(spent_style),
                Cell::from(limit_text).style(theme::dim_style()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ],
    )
    .header(Row::new(vec!["Category", "Spent", "Cap"]).style(theme::header_style()))
    .block(block);
    f.render_widget(table, area);
}

// ── Expenses ─────────────────────────────────────────────────

fn render_expenses(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Expenses ({}) ", app.state.transactions.len()))
        .border_style(Style::default().fg(theme::OVERLAY));

    if app.state.transactions.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "  No expenses yet. Press a to add one.",
            theme::dim_style(),
        ))
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let page = app.visible_rows.max(1);
    let rows: Vec<Row> = app
        .state
        .transactions
        .iter()
        .enumerate()
        .skip(app.expense_scroll)
        .take(page)
        .map(|(i, txn)| {
            let style = if i == app.expense_index {
                theme::selected_style()
            } else {
                theme::normal_style()
            };
            let category_cell = if i == app.expense_index {
                Cell::from(txn.category.as_str())
            } else {
                Cell::from(txn.category.as_str()).style(category_style(txn.category))
            };
            Row::new(vec![
                Cell::from(txn.created_at.clone()),
                Cell::from(truncate(&txn.description, 38)),
                category_cell,
                Cell::from(format!("-{}", format_amount(txn.amount))),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(14),
            Constraint::Min(20),
            Constraint::Length(14),
            Constraint::Length(13),
        ],
    )
    .header(Row::new(vec!["When", "Description", "Category", "Amount"]).style(theme::header_style()))
    .block(block);
    f.render_widget(table, area);
}

// ── Limits ───────────────────────────────────────────────────

fn render_limits(f: &mut Frame, area: Rect, app: &App) {
    let rows: Vec<Row> = Category::all()
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let spent = report::category_spending(&app.state.transactions, *category);
            let cap = app.state.category_limits.get(category).copied();
            let (cap_text, headroom_text) = match cap {
                Some(l) => (format_amount(l), format_amount(l - spent)),
                None => ("—".to_string(), "—".to_string()),
            };
            let name = if category.is_exemptible() {
                format!("{category} *")
            } else {
                category.to_string()
            };
            let style = if i == app.limit_index {
                theme::selected_style()
            } else if matches!(cap, Some(l) if spent >= l) {
                theme::over_style()
            } else {
                theme::normal_style()
            };
            Row::new(vec![
                Cell::from(name),
                Cell::from(cap_text),
                Cell::from(format_amount(spent)),
                Cell::from(headroom_text),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(34),
            Constraint::Percentage(22),
            Constraint::Percentage(22),
            Constraint::Percentage(22),
        ],
    )
    .header(Row::new(vec!["Category", "Cap", "Spent", "Headroom"]).style(theme::header_style()))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Category Limits (* may exceed budget with confirmation) ")
            .border_style(Style::default().fg(theme::OVERLAY)),
    );
    f.render_widget(table, area);
}

fn category_style(category: Category) -> Style {
    if category.is_exemptible() {
        theme::ok_style()
    } else {
        theme::dim_style()
    }
}

// ── Bars ─────────────────────────────────────────────────────

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mode_label = format!(" {} ", app.input_mode);
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default()
            .fg(theme::HEADER_BG)
            .bg(theme::ACCENT)
            .add_modifier(Modifier::BOLD),
        InputMode::Command => Style::default()
            .fg(theme::HEADER_BG)
            .bg(theme::GREEN)
            .add_modifier(Modifier::BOLD),
        InputMode::AddExpense | InputMode::SetupBudget => Style::default()
            .fg(theme::HEADER_BG)
            .bg(theme::YELLOW)
            .add_modifier(Modifier::BOLD),
        InputMode::Confirm => Style::default()
            .fg(theme::HEADER_BG)
            .bg(theme::RED)
            .add_modifier(Modifier::BOLD),
    };

    let info = format!(
        " {} | {} | {} expenses",
        app.screen,
        app.identity,
        app.state.transactions.len()
    );

    let right = match app.screen {
        Screen::Overview => " a add | :budget set | ? help ",
        Screen::Expenses => " a add | D delete | j/k move | ? help ",
        Screen::Limits => " :limit set | u drop cap | ? help ",
    };

    let available = area.width as usize;
    let used = mode_label.len() + info.len() + right.len();
    let pad = available.saturating_sub(used);

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(&mode_label, mode_style),
        Span::styled(&info, theme::status_bar_style()),
        Span::styled(" ".repeat(pad), theme::status_bar_style()),
        Span::styled(right, theme::status_bar_style()),
    ]));
    f.render_widget(bar, area);
}

fn render_command_bar(f: &mut Frame, area: Rect, app: &App) {
    let (content, cursor_offset) = match app.input_mode {
        InputMode::Command => (
            Line::from(vec![
                Span::styled(":", Style::default().fg(theme::ACCENT)),
                Span::styled(&app.command_input, theme::command_bar_style()),
            ]),
            Some(1 + app.command_input.len() as u16),
        ),
        InputMode::Confirm => (
            Line::from(vec![
                Span::styled(&app.confirm_message, theme::warn_style()),
                Span::styled(" [y/N] ", Style::default().fg(theme::RED)),
            ]),
            None,
        ),
        _ => (
            if app.status_message.is_empty() {
                Line::from(Span::styled(
                    " Press : for commands, a to add an expense, ? for help",
                    theme::dim_style(),
                ))
            } else {
                Line::from(Span::styled(
                    &app.status_message,
                    theme::command_bar_style(),
                ))
            },
            None,
        ),
    };

    let bar = Paragraph::new(content).style(Style::default().bg(theme::COMMAND_BG));
    f.render_widget(bar, area);

    if let Some(offset) = cursor_offset {
        f.set_cursor_position((area.x + offset, area.y));
    }
}

// ── Popups ───────────────────────────────────────────────────

fn render_setup_popup(f: &mut Frame, area: Rect, app: &App) {
    let popup = centered_rect(44, 7, area);
    f.render_widget(Clear, popup);

    let lines = vec![
        Line::from(Span::styled(
            "Set your spending budget",
            theme::normal_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("> ", Style::default().fg(theme::ACCENT)),
            Span::styled(&app.budget_input, theme::normal_style()),
            Span::styled("▏", theme::dim_style()),
        ]),
        Line::from(Span::styled(
            "Enter to confirm",
            theme::dim_style(),
        )),
    ];

    let modal = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Budget Setup ")
            .border_style(Style::default().fg(theme::ACCENT))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(modal, popup);
}

fn render_add_popup(f: &mut Frame, area: Rect, app: &App) {
    let popup = centered_rect(52, 9, area);
    f.render_widget(Clear, popup);

    let field_style = |field: FormField| {
        if app.form_field == field {
            theme::selected_style()
        } else {
            theme::normal_style()
        }
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(" Description: ", theme::dim_style()),
            Span::styled(
                format!("{:<30}", truncate(&app.form_description, 30)),
                field_style(FormField::Description),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Amount:      ", theme::dim_style()),
            Span::styled(
                format!("{:<30}", app.form_amount),
                field_style(FormField::Amount),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Category:    ", theme::dim_style()),
            Span::styled(
                format!("< {} >", app.form_category()),
                field_style(FormField::Category),
            ),
            if app.form_category().is_exemptible() {
                Span::styled("  (may exceed budget)", theme::dim_style())
            } else {
                Span::raw("")
            },
        ]),
        Line::from(""),
        Line::from(Span::styled(
            " Tab next field | ←/→ pick category | Enter add | Esc cancel",
            theme::dim_style(),
        )),
    ];

    let modal = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Add Expense ")
            .border_style(Style::default().fg(theme::ACCENT))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(modal, popup);
}

fn render_help_overlay(f: &mut Frame, area: Rect) {
    let mut help_text = vec![
        Line::from(Span::styled(
            " spendguard Help ",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " Navigation",
            Style::default()
                .fg(theme::YELLOW)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "  j/k or Up/Down   Move cursor           1-3        Switch tabs",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  Tab/Shift-Tab    Cycle tabs            g/G        Top/Bottom",
            theme::normal_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " Actions",
            Style::default()
                .fg(theme::YELLOW)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "  a                Add an expense        D (Expenses) Delete",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  u (Limits)       Drop selected cap     Ctrl-q     Quit",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  :                Command mode          Esc        Cancel/Back",
            theme::normal_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " Commands",
            Style::default()
                .fg(theme::YELLOW)
                .add_modifier(Modifier::BOLD),
        )),
    ];

    // Build command list dynamically from the COMMANDS registry
    let mut seen = std::collections::HashSet::new();
    let mut cmd_lines: Vec<(&str, &str)> = Vec::new();
    for (&name, cmd) in commands::COMMANDS.iter() {
        if name.len() <= 2 {
            continue;
        }
        if seen.insert(cmd.description) {
            cmd_lines.push((name, cmd.description));
        }
    }
    cmd_lines.sort_by_key(|(name, _)| *name);
    for (name, desc) in &cmd_lines {
        help_text.push(Line::from(Span::styled(
            format!("  :{name:<22} {desc}"),
            theme::normal_style(),
        )));
    }

    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(
        " Press any key to close ",
        Style::default().fg(theme::TEXT_DIM),
    )));

    let popup_height = (help_text.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup_width = 72.min(area.width.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);
    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(help, popup_area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
