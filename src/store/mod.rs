//! The entity store: the in-memory list of transactions and its persistence.
mod port;
mod schema;

use std::collections::HashSet;
use std::str::FromStr;

use rust_decimal::Decimal;

pub(crate) use port::{KeyValuePort, MemoryPort, SqlitePort};

use crate::error::{LedgerError, Result};
use crate::ledger::Ledger;
use crate::models::{Filter, NewTransaction, Transaction, TransactionId, TransactionType};

pub(crate) const DEFAULT_KEY: &str = "transaction";

pub(crate) struct Store<P: KeyValuePort> {
    port: P,
    key: String,
    transactions: Vec<Transaction>,
}

impl<P: KeyValuePort> Store<P> {
    /// Builds the store and restores whatever the port holds under `key`.
    pub(crate) fn open(port: P, key: impl Into<String>) -> Self {
        let mut store = Self {
            port,
            key: key.into(),
            transactions: Vec::new(),
        };
        store.restore();
        store
    }

    /// Missing or malformed payloads leave the store empty.
    pub(crate) fn restore(&mut self) {
        self.transactions = match self.port.get(&self.key) {
            Ok(Some(data)) => match serde_json::from_str::<Vec<Transaction>>(&data) {
                Ok(txns) => dedupe(txns),
                Err(e) => {
                    tracing::warn!("ignoring malformed payload under '{}': {e}", self.key);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("could not read '{}': {e}", self.key);
                Vec::new()
            }
        };
        tracing::debug!("restored {} transactions", self.transactions.len());
    }

    #[cfg(test)]
    pub(crate) fn into_port(self) -> P {
        self.port
    }
}

fn dedupe(txns: Vec<Transaction>) -> Vec<Transaction> {
    let mut seen = HashSet::new();
    txns.into_iter()
        .filter(|t| seen.insert(t.id.clone()))
        .collect()
}

pub(crate) fn parse_amount(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed).ok()
}

/// Saturates instead of overflowing; restored payloads are not validated.
fn sum(txns: &[Transaction], kind: TransactionType) -> Decimal {
    txns.iter()
        .filter(|t| t.kind == kind)
        .try_fold(Decimal::ZERO, |acc, t| acc.checked_add(t.amount))
        .unwrap_or_else(|| {
            tracing::warn!("{kind} total overflows, capping it");
            txns.iter()
                .filter(|t| t.kind == kind)
                .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.amount))
        })
}

impl<P: KeyValuePort> Ledger for Store<P> {
    fn create(&mut self, input: &NewTransaction) -> Result<Transaction> {
        let amount = parse_amount(&input.amount)
            .ok_or_else(|| LedgerError::validation(format!("Not a number: '{}'", input.amount)))?;
        let kind = TransactionType::parse(&input.kind)
            .ok_or_else(|| LedgerError::validation(format!("Invalid type: '{}'", input.kind)))?;

        let txn = Transaction {
            id: TransactionId::generate(),
            amount: amount.abs(),
            description: input.description.clone(),
            kind,
            category: input.category.clone(),
            account: input.account.clone(),
            created_at: chrono::Local::now().to_rfc3339(),
        };
        self.transactions.push(txn.clone());
        Ok(txn)
    }

    fn delete(&mut self, id: &TransactionId) -> Result<()> {
        self.transactions.retain(|t| &t.id != id);
        Ok(())
    }

    fn get(&mut self, id: &TransactionId) -> Result<Transaction> {
        self.transactions
            .iter()
            .find(|t| &t.id == id)
            .cloned()
            .ok_or_else(|| LedgerError::NotFound { id: id.to_string() })
    }

    fn list(&mut self) -> Vec<Transaction> {
        self.transactions.clone()
    }

    fn filter(&mut self, criterion: &str) -> Vec<Transaction> {
        let filter = Filter::parse(criterion);
        self.transactions
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect()
    }

    fn total_income(&mut self) -> Decimal {
        sum(&self.transactions, TransactionType::Income)
    }

    fn total_expense(&mut self) -> Decimal {
        sum(&self.transactions, TransactionType::Expense)
    }

    fn net_balance(&mut self) -> Decimal {
        self.total_income().saturating_sub(self.total_expense())
    }

    fn persist(&mut self) -> Result<()> {
        let payload = serde_json::to_string(&self.transactions)?;
        self.port.set(&self.key, &payload)?;
        tracing::debug!("saved {} transactions", self.transactions.len());
        Ok(())
    }
}
