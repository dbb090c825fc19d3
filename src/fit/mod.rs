pub(crate) mod engines;
