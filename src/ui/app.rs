use crate::engine::{report, BudgetAlarm, PendingExpense};
use crate::models::{BudgetState, Category, Transaction};
use crate::session::Identity;
use crate::ui::util::format_amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Overview,
    Expenses,
    Limits,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Overview, Self::Expenses, Self::Limits]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overview => write!(f, "Overview"),
            Self::Expenses => write!(f, "Expenses"),
            Self::Limits => write!(f, "Limits"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    AddExpense,
    SetupBudget,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::AddExpense => write!(f, "ADD"),
            Self::SetupBudget => write!(f, "SETUP"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action awaiting a [y/N] answer.
#[derive(Debug, Clone)]
pub(crate) enum PendingAction {
    /// An evaluated expense held back by a limit.
    CommitExpense(PendingExpense),
    DeleteTransaction { id: String, description: String },
    ResetBudget,
}

/// Which field of the add-expense form has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormField {
    Description,
    Amount,
    Category,
}

impl FormField {
    pub(crate) fn next(self) -> Self {
        match self {
            Self::Description => Self::Amount,
            Self::Amount => Self::Category,
            Self::Category => Self::Description,
        }
    }

    pub(crate) fn prev(self) -> Self {
        match self {
            Self::Description => Self::Category,
            Self::Amount => Self::Description,
            Self::Category => Self::Amount,
        }
    }
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,

    pub(crate) identity: Identity,
    pub(crate) state: BudgetState,
    pub(crate) alarm: BudgetAlarm,

    // Add-expense form
    pub(crate) form_description: String,
    pub(crate) form_amount: String,
    pub(crate) form_category: usize,
    pub(crate) form_field: FormField,

    // Setup modal
    pub(crate) budget_input: String,

    // Expenses list
    pub(crate) expense_index: usize,
    pub(crate) expense_scroll: usize,

    // Limits list
    pub(crate) limit_index: usize,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(identity: Identity, state: BudgetState) -> Self {
        let input_mode = if state.is_configured() {
            InputMode::Normal
        } else {
            InputMode::SetupBudget
        };

        let mut app = Self {
            running: true,
            screen: Screen::Overview,
            input_mode,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,

            identity,
            state,
            alarm: BudgetAlarm::default(),

            form_description: String::new(),
            form_amount: String::new(),
            form_category: Category::all().len() - 1, // Other
            form_field: FormField::Description,

            budget_input: String::new(),

            expense_index: 0,
            expense_scroll: 0,

            limit_index: 0,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        };
        // A profile loaded already over budget announces once at startup
        app.check_budget_alarm();
        app
    }

    pub(crate) fn selected_transaction(&self) -> Option<&Transaction> {
        self.state.transactions.get(self.expense_index)
    }

    pub(crate) fn selected_limit_category(&self) -> Category {
        Category::all()[self.limit_index.min(Category::all().len() - 1)]
    }

    pub(crate) fn form_category(&self) -> Category {
        Category::all()[self.form_category.min(Category::all().len() - 1)]
    }

    pub(crate) fn cycle_form_category(&mut self, delta: i32) {
        let len = Category::all().len() as i32;
        self.form_category = ((self.form_category as i32 + delta).rem_euclid(len)) as usize;
    }

    pub(crate) fn reset_form(&mut self) {
        self.form_description.clear();
        self.form_amount.clear();
        self.form_category = Category::all().len() - 1;
        self.form_field = FormField::Description;
    }

    /// Clamp the expense cursor after the list shrinks.
    pub(crate) fn clamp_expense_cursor(&mut self) {
        if self.expense_index >= self.state.transactions.len() {
            self.expense_index = self.state.transactions.len().saturating_sub(1);
        }
        if self.expense_scroll > self.expense_index {
            self.expense_scroll = self.expense_index;
        }
    }

    /// Feed the edge-triggered alarm; when spending first reaches the
    /// budget, surface a one-time notice in the status bar.
    pub(crate) fn check_budget_alarm(&mut self) {
        let total = report::total_spending(&self.state.transactions);
        if self.alarm.observe(total, self.state.budget_limit) {
            if let Some(limit) = self.state.budget_limit {
                self.status_message = format!(
                    "⚠ Budget limit reached: spent {} of {}",
                    format_amount(total),
                    format_amount(limit)
                );
            }
        }
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}
