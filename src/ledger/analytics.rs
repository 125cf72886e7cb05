use rust_decimal::Decimal;

use super::Ledger;
use crate::error::Result;
use crate::models::{NewTransaction, Transaction, TransactionId};

const MAX_ARGS_LEN: usize = 48;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AnalyticsEvent {
    pub operation: &'static str,
    pub args: String,
    pub at: String,
}

/// Records every call that passes through. Never changes inputs, outputs or errors.
pub(crate) struct Analytics<L> {
    inner: L,
    events: Vec<AnalyticsEvent>,
}

impl<L: Ledger> Analytics<L> {
    pub(crate) fn new(inner: L) -> Self {
        Self {
            inner,
            events: Vec::new(),
        }
    }

    pub(crate) fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.clone()
    }

    fn track(&mut self, operation: &'static str, args: &str) {
        let args = clip(args);
        tracing::info!(target: "tallytui::analytics", operation, args = %args);
        self.events.push(AnalyticsEvent {
            operation,
            args,
            at: chrono::Local::now().to_rfc3339(),
        });
    }
}

fn clip(args: &str) -> String {
    if args.chars().count() <= MAX_ARGS_LEN {
        return args.to_string();
    }
    let head: String = args.chars().take(MAX_ARGS_LEN - 1).collect();
    format!("{head}…")
}

impl<L: Ledger> Ledger for Analytics<L> {
    fn create(&mut self, input: &NewTransaction) -> Result<Transaction> {
        self.track(
            "create",
            &format!(
                "{}, {}, {}, {}, {}",
                input.description, input.kind, input.account, input.category, input.amount
            ),
        );
        self.inner.create(input)
    }

    fn delete(&mut self, id: &TransactionId) -> Result<()> {
        self.track("delete", id.as_str());
        self.inner.delete(id)
    }

    fn get(&mut self, id: &TransactionId) -> Result<Transaction> {
        self.track("get", id.as_str());
        self.inner.get(id)
    }

    fn list(&mut self) -> Vec<Transaction> {
        self.track("list", "");
        self.inner.list()
    }

    fn filter(&mut self, criterion: &str) -> Vec<Transaction> {
        self.track("filter", criterion);
        self.inner.filter(criterion)
    }

    fn total_income(&mut self) -> Decimal {
        self.track("total_income", "");
        self.inner.total_income()
    }

    fn total_expense(&mut self) -> Decimal {
        self.track("total_expense", "");
        self.inner.total_expense()
    }

    fn net_balance(&mut self) -> Decimal {
        self.track("net_balance", "");
        self.inner.net_balance()
    }

    fn persist(&mut self) -> Result<()> {
        self.track("persist", "");
        self.inner.persist()
    }
}
