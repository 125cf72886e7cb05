use rust_decimal::Decimal;

use super::{AuditLog, ChangeEvent, Ledger, Observer};
use crate::error::{LedgerError, Result};
use crate::models::{AuditKind, NewTransaction, Transaction, TransactionId, TransactionType};
use crate::store::parse_amount;

/// Checks creation input and returns the parsed amount and type.
///
/// Category is only required when `strict_category` is set.
pub(crate) fn check_new_transaction(
    input: &NewTransaction,
    strict_category: bool,
) -> Result<(Decimal, TransactionType)> {
    if input.amount.trim().is_empty() {
        return Err(LedgerError::validation("Amount is required"));
    }
    let amount = parse_amount(&input.amount).ok_or_else(|| {
        LedgerError::validation(format!("Amount must be a number, got '{}'", input.amount))
    })?;
    if amount <= Decimal::ZERO {
        return Err(LedgerError::validation(format!(
            "Amount must be greater than zero, got {amount}"
        )));
    }
    if input.description.trim().is_empty() {
        return Err(LedgerError::validation("Description required"));
    }
    let kind = TransactionType::parse(&input.kind).ok_or_else(|| {
        LedgerError::validation(format!(
            "Invalid type '{}': expected income or expense",
            input.kind
        ))
    })?;
    if strict_category && input.category.trim().is_empty() {
        return Err(LedgerError::validation("Category required"));
    }
    Ok((amount, kind))
}

/// Rejects an amount that would overflow the running total for its type.
pub(crate) fn check_headroom<L: Ledger + ?Sized>(
    ledger: &mut L,
    kind: TransactionType,
    amount: Decimal,
) -> Result<()> {
    let total = match kind {
        TransactionType::Income => ledger.total_income(),
        TransactionType::Expense => ledger.total_expense(),
    };
    if total.checked_add(amount).is_none() {
        return Err(LedgerError::validation(format!(
            "Amount too large: total {kind} would overflow"
        )));
    }
    Ok(())
}

fn check_id(id: &TransactionId) -> Result<()> {
    if id.is_blank() {
        return Err(LedgerError::validation("Transaction id required"));
    }
    Ok(())
}

/// Rejects bad input before it reaches the inner ledger, then auto-saves
/// and notifies observers after every successful mutation.
pub(crate) struct Validating<L> {
    inner: L,
    strict_category: bool,
    audit: AuditLog,
    observers: Vec<Observer>,
}

impl<L: Ledger> Validating<L> {
    pub(crate) fn new(inner: L, audit: AuditLog) -> Self {
        Self {
            inner,
            strict_category: false,
            audit,
            observers: Vec::new(),
        }
    }

    pub(crate) fn strict_category(mut self, strict: bool) -> Self {
        self.strict_category = strict;
        self
    }

    pub(crate) fn subscribe(&mut self, observer: Observer) {
        self.observers.push(observer);
    }

    fn reject<T>(&self, err: LedgerError) -> Result<T> {
        self.audit.record(AuditKind::Failure, err.to_string());
        Err(err)
    }

    fn after_mutate(&mut self, event: ChangeEvent) {
        if let Err(e) = self.inner.persist() {
            tracing::warn!("auto-save failed: {e}");
            self.audit
                .record(AuditKind::Info, format!("Auto-save failed: {e}"));
        }
        for observer in &mut self.observers {
            observer(&event);
        }
    }
}

impl<L: Ledger> Ledger for Validating<L> {
    fn create(&mut self, input: &NewTransaction) -> Result<Transaction> {
        let (amount, kind) = match check_new_transaction(input, self.strict_category) {
            Ok(parsed) => parsed,
            Err(e) => return self.reject(e),
        };
        if let Err(e) = check_headroom(&mut self.inner, kind, amount) {
            return self.reject(e);
        }
        let txn = match self.inner.create(input) {
            Ok(txn) => txn,
            Err(e) => return self.reject(e),
        };
        self.audit.record(
            AuditKind::Success,
            format!(
                "Added {} '{}' ${:.2}",
                txn.kind, txn.description, txn.amount
            ),
        );
        self.after_mutate(ChangeEvent::Created(txn.clone()));
        Ok(txn)
    }

    fn delete(&mut self, id: &TransactionId) -> Result<()> {
        if let Err(e) = check_id(id) {
            return self.reject(e);
        }
        if let Err(e) = self.inner.delete(id) {
            return self.reject(e);
        }
        self.audit
            .record(AuditKind::Success, format!("Deleted transaction {id}"));
        self.after_mutate(ChangeEvent::Deleted(id.clone()));
        Ok(())
    }

    fn get(&mut self, id: &TransactionId) -> Result<Transaction> {
        if let Err(e) = check_id(id) {
            return self.reject(e);
        }
        self.inner.get(id)
    }

    fn list(&mut self) -> Vec<Transaction> {
        self.inner.list()
    }

    fn filter(&mut self, criterion: &str) -> Vec<Transaction> {
        self.inner.filter(criterion)
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
