use std::cell::Cell;
use std::rc::Rc;

use crate::config::Settings;
use crate::error::Result;
use crate::ledger::{Analytics, AuditLog, Chain, ChainBuilder, ChangeEvent, Ledger};
use crate::models::{NewTransaction, Transaction};
use crate::pipeline::{add_transaction, PipelineSettings};
use crate::store::{KeyValuePort, Store};

/// Everything the CLI and the TUI talk to: the outermost ledger, the audit
/// trail it shares, and the add-transaction pipeline settings.
pub(crate) struct Session {
    pub(crate) chain: Chain,
    pub(crate) pipeline: PipelineSettings,
    pub(crate) audit_tail: usize,
    dirty: Rc<Cell<bool>>,
}

impl Session {
    pub(crate) fn open<P: KeyValuePort + 'static>(port: P, settings: &Settings) -> Self {
        let store = Store::open(port, settings.storage_key.as_str());
        let dirty = Rc::new(Cell::new(true));
        let flag = Rc::clone(&dirty);

        let chain = ChainBuilder::new(store)
            .order(settings.layer_order)
            .strict_category(settings.strict_category)
            .subscribe(Box::new(move |event: &ChangeEvent| {
                tracing::trace!("change: {event:?}");
                flag.set(true);
            }))
            .build();
        tracing::info!(
            "ledger ready: key '{}', {}",
            settings.storage_key,
            chain.order.as_str()
        );

        Self {
            chain,
            pipeline: settings.pipeline_settings(),
            audit_tail: settings.audit_tail,
            dirty,
        }
    }

    pub(crate) fn ledger(&mut self) -> &mut Analytics<Box<dyn Ledger>> {
        &mut self.chain.ledger
    }

    pub(crate) fn audit(&self) -> &AuditLog {
        &self.chain.audit
    }

    pub(crate) fn add(&mut self, input: NewTransaction) -> Result<Transaction> {
        add_transaction(
            &mut self.chain.ledger,
            input,
            &self.pipeline,
            &self.chain.audit,
        )
    }

    /// True once after any change notification.
    pub(crate) fn take_dirty(&self) -> bool {
        self.dirty.replace(false)
    }
}
