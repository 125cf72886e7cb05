mod audit_entry;
mod filter;
mod transaction;

pub(crate) use audit_entry::{AuditEntry, AuditKind};
pub(crate) use filter::Filter;
pub(crate) use transaction::{NewTransaction, Transaction, TransactionId, TransactionType};
