pub(crate) mod compose;
pub(crate) mod surface;
pub(crate) mod surface_pool;
