use rust_decimal::Decimal;

use crate::error::LedgerError;
use crate::ledger::Ledger;
use crate::models::{AuditEntry, Filter, Transaction, TransactionId};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingAction {
    DeleteTransaction {
        id: TransactionId,
        description: String,
    },
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) filter: Filter,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,

    // Summary cards
    pub(crate) total_income: Decimal,
    pub(crate) total_expense: Decimal,
    pub(crate) net_balance: Decimal,

    // Transactions
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) transaction_index: usize,
    pub(crate) transaction_scroll: usize,

    // Audit panel, newest first
    pub(crate) audit: Vec<AuditEntry>,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new() -> Self {
        Self {
            running: true,
            filter: Filter::All,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,

            total_income: Decimal::ZERO,
            total_expense: Decimal::ZERO,
            net_balance: Decimal::ZERO,

            transactions: Vec::new(),
            transaction_index: 0,
            transaction_scroll: 0,

            audit: Vec::new(),

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    /// Re-reads the list, the totals and the audit tail from the outermost ledger.
    pub(crate) fn refresh(&mut self, session: &mut Session) {
        let ledger = session.ledger();
        self.transactions = ledger.filter(self.filter.as_str());
        self.total_income = ledger.total_income();
        self.total_expense = ledger.total_expense();
        self.net_balance = ledger.net_balance();
        self.audit = session.audit().recent(session.audit_tail);

        if self.transaction_index >= self.transactions.len() {
            self.transaction_index = self.transactions.len().saturating_sub(1);
        }
        if self.transaction_scroll > self.transaction_index {
            self.transaction_scroll = self.transaction_index;
        }
    }

    /// Refreshes only if something changed since the last call.
    pub(crate) fn refresh_if_dirty(&mut self, session: &mut Session) {
        if session.take_dirty() {
            self.refresh(session);
        }
    }

    pub(crate) fn set_filter(&mut self, filter: Filter, session: &mut Session) {
        self.filter = filter;
        self.transaction_index = 0;
        self.transaction_scroll = 0;
        self.refresh(session);
    }

    pub(crate) fn selected(&self) -> Option<&Transaction> {
        self.transactions.get(self.transaction_index)
    }

    pub(crate) fn empty_message(&self) -> (&'static str, &'static str) {
        match self.filter {
            Filter::All => (
                "No transactions yet",
                "Add your monthly expenses and incomes with :add",
            ),
            Filter::Income | Filter::Expense => {
                ("No transactions here", "No transactions with this type")
            }
        }
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    /// Validation messages go through as-is; anything else is marked as an error.
    pub(crate) fn report_error(&mut self, err: &LedgerError) {
        if err.is_validation() {
            self.set_status(err.to_string());
        } else {
            self.set_status(format!("Error: {err}"));
        }
    }
}
