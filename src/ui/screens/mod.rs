pub(crate) mod audit;
pub(crate) mod summary;
pub(crate) mod transactions;
