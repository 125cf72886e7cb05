use super::{Transaction, TransactionType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Filter {
    All,
    Income,
    Expense,
}

impl Filter {
    /// Unrecognised criteria behave as `All`.
    pub(crate) fn parse(criterion: &str) -> Self {
        match criterion {
            "income" => Self::Income,
            "expense" => Self::Expense,
            _ => Self::All,
        }
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub(crate) fn all() -> &'static [Filter] {
        &[Self::All, Self::Income, Self::Expense]
    }

    pub(crate) fn cache_key(&self) -> String {
        format!("filter:{}", self.as_str())
    }

    pub(crate) fn matches(&self, txn: &Transaction) -> bool {
        match self {
            Self::All => true,
            Self::Income => txn.kind == TransactionType::Income,
            Self::Expense => txn.kind == TransactionType::Expense,
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "All"),
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
        }
    }
}
