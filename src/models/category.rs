use serde::{Deserialize, Serialize};

/// Fixed expense categories. The first four are exemptible: they may push
/// total spending over the budget, subject to explicit confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub(crate) enum Category {
    Health,
    Medical,
    Emergency,
    Essential,
    Groceries,
    Entertainment,
    Transport,
    Other,
}

impl Category {
    pub(crate) fn all() -> &'static [Category] {
        &[
            Self::Health,
            Self::Medical,
            Self::Emergency,
            Self::Essential,
            Self::Groceries,
            Self::Entertainment,
            Self::Transport,
            Self::Other,
        ]
    }

    /// Find a category by name (case-insensitive).
    pub(crate) fn parse(name: &str) -> Option<Category> {
        let lower = name.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str().to_lowercase() == lower)
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Health => "Health",
            Self::Medical => "Medical",
            Self::Emergency => "Emergency",
            Self::Essential => "Essential",
            Self::Groceries => "Groceries",
            Self::Entertainment => "Entertainment",
            Self::Transport => "Transport",
            Self::Other => "Other",
        }
    }

    /// Whether this category is allowed to exceed the overall budget
    /// (with confirmation).
    pub(crate) fn is_exemptible(&self) -> bool {
        matches!(
            self,
            Self::Health | Self::Medical | Self::Emergency | Self::Essential
        )
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
