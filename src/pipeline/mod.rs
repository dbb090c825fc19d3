pub(crate) mod batch;
pub(crate) mod deferred;
pub(crate) mod recipe;
pub(crate) mod stepwise;
