pub(crate) mod calc;
pub(crate) mod config;
pub(crate) mod padding;
