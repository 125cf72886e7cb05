//! The transaction ledger operation set and the layers that wrap it.
//!
//! Every layer implements [`Ledger`] and owns exactly one inner ledger. The
//! innermost ledger is always the [`Store`](crate::store::Store).
mod analytics;
mod audit;
mod caching;
mod chain;
mod validating;

use rust_decimal::Decimal;

pub(crate) use analytics::Analytics;
pub(crate) use audit::AuditLog;
pub(crate) use caching::Caching;
pub(crate) use chain::{Chain, ChainBuilder, LayerOrder};
pub(crate) use validating::{check_headroom, check_new_transaction, Validating};

use crate::error::Result;
use crate::models::{NewTransaction, Transaction, TransactionId};

/// Operations the UI can call on the outermost layer.
///
/// Reads take `&mut self` as well: observational layers record them.
pub(crate) trait Ledger {
    fn create(&mut self, input: &NewTransaction) -> Result<Transaction>;
    fn delete(&mut self, id: &TransactionId) -> Result<()>;
    fn get(&mut self, id: &TransactionId) -> Result<Transaction>;
    fn list(&mut self) -> Vec<Transaction>;
    fn filter(&mut self, criterion: &str) -> Vec<Transaction>;
    fn total_income(&mut self) -> Decimal;
    fn total_expense(&mut self) -> Decimal;
    fn net_balance(&mut self) -> Decimal;
    fn persist(&mut self) -> Result<()>;
}

impl<L: Ledger + ?Sized> Ledger for Box<L> {
    fn create(&mut self, input: &NewTransaction) -> Result<Transaction> {
        (**self).create(input)
    }

    fn delete(&mut self, id: &TransactionId) -> Result<()> {
        (**self).delete(id)
    }

    fn get(&mut self, id: &TransactionId) -> Result<Transaction> {
        (**self).get(id)
    }

    fn list(&mut self) -> Vec<Transaction> {
        (**self).list()
    }

    fn filter(&mut self, criterion: &str) -> Vec<Transaction> {
        (**self).filter(criterion)
    }

    fn total_income(&mut self) -> Decimal {
        (**self).total_income()
    }

    fn total_expense(&mut self) -> Decimal {
        (**self).total_expense()
    }

    fn net_balance(&mut self) -> Decimal {
        (**self).net_balance()
    }

    fn persist(&mut self) -> Result<()> {
        (**self).persist()
    }
}

/// Emitted after a mutation has been applied and auto-saved.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ChangeEvent {
    Created(Transaction),
    Deleted(TransactionId),
}

pub(crate) type Observer = Box<dyn FnMut(&ChangeEvent)>;

#[cfg(test)]
mod tests;
