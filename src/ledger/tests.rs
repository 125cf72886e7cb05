#![allow(clippy::unwrap_used)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::error::LedgerError;
use crate::models::{AuditKind, NewTransaction, Transaction, TransactionId, TransactionType};
use crate::store::{KeyValuePort, MemoryPort, Store, DEFAULT_KEY};

// ── Helpers ───────────────────────────────────────────────────

fn chain() -> Chain {
    ChainBuilder::new(Store::open(MemoryPort::new(), DEFAULT_KEY)).build()
}

fn salary() -> NewTransaction {
    NewTransaction::new("Salary", "income", "Checking", "job", "1000")
}

fn lunch() -> NewTransaction {
    NewTransaction::new("Lunch", "expense", "Checking", "food", "15")
}

/// Port whose contents stay readable from outside the chain.
#[derive(Clone, Default)]
struct SharedPort(Rc<RefCell<HashMap<String, String>>>);

impl KeyValuePort for SharedPort {
    fn get(&self, key: &str) -> crate::error::Result<Option<String>> {
        Ok(self.0.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> crate::error::Result<()> {
        self.0.borrow_mut().insert(key.into(), value.into());
        Ok(())
    }
}

struct FailingPort;

impl KeyValuePort for FailingPort {
    fn get(&self, _key: &str) -> crate::error::Result<Option<String>> {
        Ok(None)
    }

    fn set(&mut self, _key: &str, _value: &str) -> crate::error::Result<()> {
        Err(LedgerError::persistence("quota exceeded"))
    }
}

/// Counts how many `filter` calls reach the wrapped ledger.
struct CountingFilters<L> {
    inner: L,
    calls: Rc<Cell<usize>>,
}

impl<L: Ledger> Ledger for CountingFilters<L> {
    fn create(&mut self, input: &NewTransaction) -> crate::error::Result<Transaction> {
        self.inner.create(input)
    }
    fn delete(&mut self, id: &TransactionId) -> crate::error::Result<()> {
        self.inner.delete(id)
    }
    fn get(&mut self, id: &TransactionId) -> crate::error::Result<Transaction> {
        self.inner.get(id)
    }
    fn list(&mut self) -> Vec<Transaction> {
        self.inner.list()
    }
    fn filter(&mut self, criterion: &str) -> Vec<Transaction> {
        self.calls.set(self.calls.get() + 1);
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
    fn persist(&mut self) -> crate::error::Result<()> {
        self.inner.persist()
    }
}

/// Refuses every delete; everything else goes to the wrapped ledger.
struct LockedDeletes<L>(L);

impl<L: Ledger> Ledger for LockedDeletes<L> {
    fn create(&mut self, input: &NewTransaction) -> crate::error::Result<Transaction> {
        self.0.create(input)
    }
    fn delete(&mut self, _id: &TransactionId) -> crate::error::Result<()> {
        Err(LedgerError::persistence("ledger is locked"))
    }
    fn get(&mut self, id: &TransactionId) -> crate::error::Result<Transaction> {
        self.0.get(id)
    }
    fn list(&mut self) -> Vec<Transaction> {
        self.0.list()
    }
    fn filter(&mut self, criterion: &str) -> Vec<Transaction> {
        self.0.filter(criterion)
    }
    fn total_income(&mut self) -> Decimal {
        self.0.total_income()
    }
    fn total_expense(&mut self) -> Decimal {
        self.0.total_expense()
    }
    fn net_balance(&mut self) -> Decimal {
        self.0.net_balance()
    }
    fn persist(&mut self) -> crate::error::Result<()> {
        self.0.persist()
    }
}

fn counting_store() -> (CountingFilters<Store<MemoryPort>>, Rc<Cell<usize>>) {
    let calls = Rc::new(Cell::new(0));
    let spy = CountingFilters {
        inner: Store::open(MemoryPort::new(), DEFAULT_KEY),
        calls: calls.clone(),
    };
    (spy, calls)
}

// ── End to end ────────────────────────────────────────────────

#[test]
fn test_salary_and_lunch_totals() {
    let mut chain = chain();
    chain.ledger.create(&salary()).unwrap();
    chain.ledger.create(&lunch()).unwrap();

    assert_eq!(chain.ledger.total_income(), dec!(1000));
    assert_eq!(chain.ledger.total_expense(), dec!(15));
    assert_eq!(chain.ledger.net_balance(), dec!(985));

    let all = chain.ledger.list();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].description, "Salary");
    assert_eq!(all[1].description, "Lunch");
}

#[test]
fn test_valid_create_grows_list_with_unique_id() {
    let mut chain = chain();
    let mut ids = HashSet::new();
    for i in 0..25 {
        let before = chain.ledger.list().len();
        let txn = chain
            .ledger
            .create(&NewTransaction::new(
                format!("item {i}"),
                "expense",
                "Cash",
                "misc",
                "1.50",
            ))
            .unwrap();
        assert_eq!(chain.ledger.list().len(), before + 1);
        assert!(ids.insert(txn.id), "duplicate id on creation {i}");
    }
}

#[test]
fn test_net_balance_invariant() {
    let mut chain = chain();
    let inputs = [
        ("a", "income", "10.25"),
        ("b", "expense", "3.10"),
        ("c", "expense", "40"),
        ("d", "income", "0.05"),
    ];
    for (desc, kind, amount) in inputs {
        chain
            .ledger
            .create(&NewTransaction::new(desc, kind, "Cash", "misc", amount))
            .unwrap();
        let income = chain.ledger.total_income();
        let expense = chain.ledger.total_expense();
        assert_eq!(income - expense, chain.ledger.net_balance());
    }
    assert_eq!(chain.ledger.net_balance(), dec!(-32.80));
}

#[test]
fn test_filter_returns_ordered_subsequence() {
    let mut chain = chain();
    chain.ledger.create(&salary()).unwrap();
    chain.ledger.create(&lunch()).unwrap();
    chain
        .ledger
        .create(&NewTransaction::new("Bonus", "income", "Savings", "job", "200"))
        .unwrap();

    let income: Vec<String> = chain
        .ledger
        .filter("income")
        .into_iter()
        .map(|t| t.description)
        .collect();
    assert_eq!(income, vec!["Salary", "Bonus"]);

    let expense = chain.ledger.filter("expense");
    assert_eq!(expense.len(), 1);
    assert_eq!(expense[0].description, "Lunch");

    assert_eq!(chain.ledger.filter("anything-else"), chain.ledger.list());
    assert_eq!(chain.ledger.filter("all"), chain.ledger.list());
}

#[test]
fn test_delete_missing_id_is_noop() {
    let mut chain = chain();
    chain.ledger.create(&salary()).unwrap();
    let before = chain.ledger.list();

    chain.ledger.delete(&TransactionId::from("nope")).unwrap();
    assert_eq!(chain.ledger.list(), before);
}

#[test]
fn test_delete_removes_only_matching() {
    let mut chain = chain();
    let a = chain.ledger.create(&salary()).unwrap();
    let b = chain.ledger.create(&lunch()).unwrap();

    chain.ledger.delete(&a.id).unwrap();
    let remaining = chain.ledger.list();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, b.id);
}

#[test]
fn test_get() {
    let mut chain = chain();
    let txn = chain.ledger.create(&salary()).unwrap();
    assert_eq!(chain.ledger.get(&txn.id).unwrap(), txn);
    assert!(matches!(
        chain.ledger.get(&TransactionId::from("missing")),
        Err(LedgerError::NotFound { .. })
    ));
    assert!(chain.ledger.get(&TransactionId::from("")).unwrap_err().is_validation());
}

// ── Validation ────────────────────────────────────────────────

#[test]
fn test_validation_rejects_without_mutation() {
    let mut chain = chain();
    chain.ledger.create(&salary()).unwrap();
    let before = chain.ledger.list();

    let bad = [
        NewTransaction::new("Lunch", "expense", "Cash", "food", ""),
        NewTransaction::new("Lunch", "expense", "Cash", "food", "abc"),
        NewTransaction::new("Lunch", "expense", "Cash", "food", "-5"),
        NewTransaction::new("Lunch", "expense", "Cash", "food", "0"),
        NewTransaction::new("", "expense", "Cash", "food", "5"),
        NewTransaction::new("   ", "expense", "Cash", "food", "5"),
        NewTransaction::new("Lunch", "savings", "Cash", "food", "5"),
    ];
    for input in &bad {
        let err = chain.ledger.create(input).unwrap_err();
        assert!(err.is_validation(), "expected validation error for {input:?}");
    }
    assert_eq!(chain.ledger.list(), before);
}

#[test]
fn test_validation_messages() {
    let check = |amount: &str, desc: &str, kind: &str| {
        check_new_transaction(&NewTransaction::new(desc, kind, "a", "c", amount), false)
            .unwrap_err()
            .to_string()
    };
    assert_eq!(check("", "x", "income"), "Amount is required");
    assert_eq!(check("abc", "x", "income"), "Amount must be a number, got 'abc'");
    assert_eq!(check("0", "x", "income"), "Amount must be greater than zero, got 0");
    assert_eq!(check("5", "", "income"), "Description required");
    assert_eq!(
        check("5", "x", "savings"),
        "Invalid type 'savings': expected income or expense"
    );
}

#[test]
fn test_strict_category() {
    let store = Store::open(MemoryPort::new(), DEFAULT_KEY);
    let mut strict = ChainBuilder::new(store).strict_category(true).build();
    let err = strict
        .ledger
        .create(&NewTransaction::new("Lunch", "expense", "Cash", " ", "5"))
        .unwrap_err();
    assert_eq!(err.to_string(), "Category required");

    // Lenient by default
    let mut lenient = chain();
    assert!(lenient
        .ledger
        .create(&NewTransaction::new("Lunch", "expense", "Cash", "", "5"))
        .is_ok());
}

#[test]
fn test_delete_blank_id_rejected() {
    let mut chain = chain();
    chain.ledger.create(&salary()).unwrap();
    let err = chain.ledger.delete(&TransactionId::from("  ")).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(chain.ledger.list().len(), 1);
}

#[test]
fn test_amount_overflowing_total_rejected() {
    let mut chain = chain();
    let max = Decimal::MAX.to_string();
    let big = NewTransaction::new("Jackpot", "income", "Checking", "misc", &max);

    chain.ledger.create(&big).unwrap();
    let err = chain.ledger.create(&big).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.to_string(), "Amount too large: total income would overflow");
    assert_eq!(chain.ledger.list().len(), 1);
    assert_eq!(chain.ledger.total_income(), Decimal::MAX);
    assert_eq!(chain.audit.recent(1)[0].kind, AuditKind::Failure);

    // Expenses have their own total.
    let spend = NewTransaction::new("Yacht", "expense", "Checking", "fun", &max);
    chain.ledger.create(&spend).unwrap();
    assert_eq!(chain.ledger.net_balance(), dec!(0));
}

#[test]
fn test_overflow_rejected_in_legacy_order() {
    let mut chain = ChainBuilder::new(Store::open(MemoryPort::new(), DEFAULT_KEY))
        .order(LayerOrder::CacheThenValidate)
        .build();
    let max = Decimal::MAX.to_string();
    let big = NewTransaction::new("Refund", "expense", "Cash", "misc", &max);

    chain.ledger.create(&big).unwrap();
    assert!(chain.ledger.create(&big).unwrap_err().is_validation());
    assert_eq!(chain.ledger.total_expense(), Decimal::MAX);
}

#[test]
fn test_failed_delete_is_audited() {
    let audit = AuditLog::new();
    let mut ledger = Validating::new(
        LockedDeletes(Store::open(MemoryPort::new(), DEFAULT_KEY)),
        audit.clone(),
    );
    let txn = ledger.create(&salary()).unwrap();

    let err = ledger.delete(&txn.id).unwrap_err();
    assert!(matches!(err, LedgerError::PersistenceFailed { .. }));
    let last = &audit.recent(1)[0];
    assert_eq!(last.kind, AuditKind::Failure);
    assert!(last.message.contains("ledger is locked"));
    assert_eq!(ledger.list().len(), 1);
}

// ── Audit log ─────────────────────────────────────────────────

#[test]
fn test_audit_records_successes_and_failures() {
    let mut chain = chain();
    chain.ledger.create(&salary()).unwrap();
    let _ = chain
        .ledger
        .create(&NewTransaction::new("Lunch", "savings", "Cash", "food", "5"));

    let entries = chain.audit.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].kind, AuditKind::Success);
    assert_eq!(entries[0].message, "Added income 'Salary' $1000.00");
    assert_eq!(entries[1].kind, AuditKind::Failure);
    assert!(entries[1].message.starts_with("Invalid type"));
}

#[test]
fn test_audit_recent_is_newest_first() {
    let audit = AuditLog::new();
    for i in 0..15 {
        audit.record(AuditKind::Info, format!("entry {i}"));
    }
    let recent = audit.recent(10);
    assert_eq!(recent.len(), 10);
    assert_eq!(recent[0].message, "entry 14");
    assert_eq!(recent[9].message, "entry 5");
    assert_eq!(audit.len(), 15);
}

// ── Side effects ──────────────────────────────────────────────

#[test]
fn test_auto_save_happens_before_observers_run() {
    let port = SharedPort::default();
    let seen = Rc::new(RefCell::new(Vec::new()));

    let observed_port = port.clone();
    let observed = seen.clone();
    let mut chain = ChainBuilder::new(Store::open(port, DEFAULT_KEY))
        .subscribe(Box::new(move |event: &ChangeEvent| {
            let saved = observed_port.get(DEFAULT_KEY).unwrap().unwrap_or_default();
            let txns: Vec<Transaction> = serde_json::from_str(&saved).unwrap();
            observed.borrow_mut().push((event.clone(), txns.len()));
        }))
        .build();

    let txn = chain.ledger.create(&salary()).unwrap();
    chain.ledger.delete(&txn.id).unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], (ChangeEvent::Created(txn.clone()), 1));
    assert_eq!(seen[1], (ChangeEvent::Deleted(txn.id.clone()), 0));
}

#[test]
fn test_rejected_create_does_not_notify() {
    let count = Rc::new(Cell::new(0));
    let counter = count.clone();
    let mut chain = ChainBuilder::new(Store::open(MemoryPort::new(), DEFAULT_KEY))
        .subscribe(Box::new(move |_: &ChangeEvent| counter.set(counter.get() + 1)))
        .build();

    let _ = chain
        .ledger
        .create(&NewTransaction::new("x", "income", "a", "c", "-1"));
    assert_eq!(count.get(), 0);
}

#[test]
fn test_persistence_failure_keeps_in_memory_change() {
    let mut chain = ChainBuilder::new(Store::open(FailingPort, DEFAULT_KEY)).build();
    let txn = chain.ledger.create(&salary()).unwrap();

    assert_eq!(chain.ledger.list(), vec![txn]);
    let entries = chain.audit.entries();
    assert!(entries
        .iter()
        .any(|e| e.kind == AuditKind::Info && e.message.contains("quota exceeded")));
    assert!(matches!(
        chain.ledger.persist(),
        Err(LedgerError::PersistenceFailed { .. })
    ));
}

// ── Caching ───────────────────────────────────────────────────

#[test]
fn test_cache_hit_skips_inner_ledger() {
    let (spy, calls) = counting_store();
    let mut cached = Caching::new(spy);

    cached.filter("income");
    cached.filter("income");
    assert_eq!(calls.get(), 1);

    // Unknown criteria share the "all" entry
    cached.filter("all");
    cached.filter("bogus");
    assert_eq!(calls.get(), 2);
    assert_eq!(cached.cached_keys(), 2);
}

#[test]
fn test_cache_not_stale_after_mutation() {
    let mut chain = chain();
    chain.ledger.create(&salary()).unwrap();
    assert_eq!(chain.ledger.filter("expense").len(), 0);

    let lunch = chain.ledger.create(&lunch()).unwrap();
    assert_eq!(chain.ledger.filter("expense").len(), 1);

    chain.ledger.delete(&lunch.id).unwrap();
    assert_eq!(chain.ledger.filter("expense").len(), 0);
    assert_eq!(chain.ledger.filter("all").len(), 1);
}

#[test]
fn test_cached_results_are_copies() {
    let (spy, _) = counting_store();
    let mut cached = Caching::new(spy);
    cached.create(&salary()).unwrap();

    let mut first = cached.filter("all");
    first.clear();
    assert_eq!(cached.filter("all").len(), 1);
}

#[test]
fn test_validate_then_cache_keeps_cache_on_rejection() {
    let (spy, calls) = counting_store();
    let mut ledger = Validating::new(Caching::new(spy), AuditLog::new());

    ledger.filter("all");
    let _ = ledger.create(&NewTransaction::new("x", "income", "a", "c", "abc"));
    ledger.filter("all");
    assert_eq!(calls.get(), 1, "rejected input must not clear the cache");
}

#[test]
fn test_cache_then_validate_clears_cache_on_rejection() {
    let (spy, calls) = counting_store();
    let mut ledger = Caching::new(Validating::new(spy, AuditLog::new()));

    ledger.filter("all");
    let _ = ledger.create(&NewTransaction::new("x", "income", "a", "c", "abc"));
    ledger.filter("all");
    assert_eq!(calls.get(), 2, "legacy order clears before validating");
}

#[test]
fn test_both_orders_agree_on_results() {
    for order in [LayerOrder::ValidateThenCache, LayerOrder::CacheThenValidate] {
        let mut chain = ChainBuilder::new(Store::open(MemoryPort::new(), DEFAULT_KEY))
            .order(order)
            .build();
        assert_eq!(chain.order, order);
        chain.ledger.create(&salary()).unwrap();
        assert!(chain
            .ledger
            .create(&NewTransaction::new("x", "income", "a", "c", "0"))
            .is_err());
        chain.ledger.create(&lunch()).unwrap();
        assert_eq!(chain.ledger.filter("income").len(), 1);
        assert_eq!(chain.ledger.net_balance(), dec!(985));
    }
}

// ── Analytics ─────────────────────────────────────────────────

#[test]
fn test_analytics_observes_every_call() {
    let mut chain = chain();
    chain.ledger.create(&salary()).unwrap();
    let _ = chain
        .ledger
        .create(&NewTransaction::new("x", "savings", "a", "c", "1"));
    chain.ledger.filter("income");
    chain.ledger.net_balance();

    let ops: Vec<&str> = chain.ledger.events().iter().map(|e| e.operation).collect();
    assert_eq!(ops, vec!["create", "create", "filter", "net_balance"]);
    assert_eq!(chain.ledger.events()[0].args, "Salary, income, Checking, job, 1000");
}

#[test]
fn test_analytics_clips_long_arguments() {
    let mut chain = chain();
    let long = "x".repeat(500);
    chain
        .ledger
        .create(&NewTransaction::new(long, "income", "a", "c", "1"))
        .unwrap();
    let args = &chain.ledger.events()[0].args;
    assert_eq!(args.chars().count(), 48);
    assert!(args.ends_with('…'));
}

#[test]
fn test_analytics_passes_errors_through_unchanged() {
    let (spy, _) = counting_store();
    let mut plain = Validating::new(spy, AuditLog::new());
    let (spy, _) = counting_store();
    let mut observed = Analytics::new(Validating::new(spy, AuditLog::new()));

    let input = NewTransaction::new("x", "income", "a", "c", "abc");
    assert_eq!(
        plain.create(&input).unwrap_err(),
        observed.create(&input).unwrap_err()
    );
}

#[test]
fn test_created_transaction_fields() {
    let mut chain = chain();
    let txn = chain
        .ledger
        .create(&NewTransaction::new("Lunch", "expense", "Visa", "food", " 12.50 "))
        .unwrap();
    assert_eq!(txn.kind, TransactionType::Expense);
    assert_eq!(txn.amount, dec!(12.50));
    assert_eq!(txn.account, "Visa");
    assert_eq!(txn.category, "food");
    assert!(!txn.id.is_blank());
    assert!(chrono::DateTime::parse_from_rfc3339(&txn.created_at).is_ok());
}
