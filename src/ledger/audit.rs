use std::cell::RefCell;
use std::rc::Rc;

use crate::models::{AuditEntry, AuditKind};

/// Append-only audit trail shared between the validation layer and the UI.
#[derive(Debug, Clone, Default)]
pub(crate) struct AuditLog {
    entries: Rc<RefCell<Vec<AuditEntry>>>,
}

impl AuditLog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&self, kind: AuditKind, message: impl Into<String>) {
        let entry = AuditEntry::new(kind, message);
        tracing::info!(target: "tallytui::audit", "[{}] {}", kind.as_str(), entry.message);
        self.entries.borrow_mut().push(entry);
    }

    #[cfg(test)]
    pub(crate) fn entries(&self) -> Vec<AuditEntry> {
        self.entries.borrow().clone()
    }

    /// The last `n` entries, newest first.
    pub(crate) fn recent(&self, n: usize) -> Vec<AuditEntry> {
        self.entries.borrow().iter().rev().take(n).cloned().collect()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}
