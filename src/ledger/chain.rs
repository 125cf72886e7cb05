use serde::Deserialize;

use super::{Analytics, AuditLog, Caching, Ledger, Observer, Validating};
use crate::store::{KeyValuePort, Store};

/// Where the cache sits relative to validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum LayerOrder {
    /// `Analytics → Validating → Caching → Store`. Rejected input never clears the cache.
    #[default]
    ValidateThenCache,
    /// `Analytics → Caching → Validating → Store`. Any mutation attempt clears
    /// the cache, including ones validation then rejects.
    CacheThenValidate,
}

impl LayerOrder {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::ValidateThenCache => "validate-then-cache",
            Self::CacheThenValidate => "cache-then-validate",
        }
    }
}

/// The wired ledger plus the handles the UI reads from.
pub(crate) struct Chain {
    pub(crate) ledger: Analytics<Box<dyn Ledger>>,
    pub(crate) audit: AuditLog,
    pub(crate) order: LayerOrder,
}

pub(crate) struct ChainBuilder<P: KeyValuePort> {
    store: Store<P>,
    order: LayerOrder,
    strict_category: bool,
    audit: AuditLog,
    observers: Vec<Observer>,
}

impl<P: KeyValuePort + 'static> ChainBuilder<P> {
    pub(crate) fn new(store: Store<P>) -> Self {
        Self {
            store,
            order: LayerOrder::default(),
            strict_category: false,
            audit: AuditLog::new(),
            observers: Vec::new(),
        }
    }

    pub(crate) fn order(mut self, order: LayerOrder) -> Self {
        self.order = order;
        self
    }

    pub(crate) fn strict_category(mut self, strict: bool) -> Self {
        self.strict_category = strict;
        self
    }

    pub(crate) fn subscribe(mut self, observer: Observer) -> Self {
        self.observers.push(observer);
        self
    }

    pub(crate) fn build(self) -> Chain {
        let Self {
            store,
            order,
            strict_category,
            audit,
            observers,
        } = self;

        let inner: Box<dyn Ledger> = match order {
            LayerOrder::ValidateThenCache => Box::new(with_observers(
                Validating::new(Caching::new(store), audit.clone())
                    .strict_category(strict_category),
                observers,
            )),
            LayerOrder::CacheThenValidate => Box::new(Caching::new(with_observers(
                Validating::new(store, audit.clone()).strict_category(strict_category),
                observers,
            ))),
        };
        tracing::debug!("ledger chain wired ({})", order.as_str());

        Chain {
            ledger: Analytics::new(inner),
            audit,
            order,
        }
    }
}

fn with_observers<L: Ledger>(mut validating: Validating<L>, observers: Vec<Observer>) -> Validating<L> {
    for observer in observers {
        validating.subscribe(observer);
    }
    validating
}
