use std::collections::HashMap;

use rust_decimal::Decimal;

use super::Ledger;
use crate::error::Result;
use crate::models::{Filter, NewTransaction, Transaction, TransactionId};

/// Memoises `filter` results until the next mutation.
pub(crate) struct Caching<L> {
    inner: L,
    cache: HashMap<String, Vec<Transaction>>,
}

impl<L: Ledger> Caching<L> {
    pub(crate) fn new(inner: L) -> Self {
        Self {
            inner,
            cache: HashMap::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn cached_keys(&self) -> usize {
        self.cache.len()
    }

    fn invalidate(&mut self) {
        if !self.cache.is_empty() {
            tracing::debug!("cache cleared ({} keys)", self.cache.len());
        }
        self.cache.clear();
    }
}

impl<L: Ledger> Ledger for Caching<L> {
    fn create(&mut self, input: &NewTransaction) -> Result<Transaction> {
        self.invalidate();
        self.inner.create(input)
    }

    fn delete(&mut self, id: &TransactionId) -> Result<()> {
        self.invalidate();
        self.inner.delete(id)
    }

    fn get(&mut self, id: &TransactionId) -> Result<Transaction> {
        self.inner.get(id)
    }

    fn list(&mut self) -> Vec<Transaction> {
        self.inner.list()
    }

    fn filter(&mut self, criterion: &str) -> Vec<Transaction> {
        let key = Filter::parse(criterion).cache_key();
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!("cache hit {key}");
            return hit.clone();
        }
        tracing::debug!("cache miss {key}");
        let result = self.inner.filter(criterion);
        self.cache.insert(key, result.clone());
        result
    }

    fn total_income(&mut self) -> Decimal {
        self.inner.total_income()
    }

    fn total_expense(&mut self) -> Decimal {
        self.inner.total_expense()
    }

    fn net_balance(&mut self) -> Decimal {
        self.inner.net_balance()
    }

    fn persist(&mut self) -> Result<()> {
        self.inner.persist()
    }
}
