/// Tolerance for floating-point comparisons throughout the crate: two values
/// closer than this are treated as equal.
pub const EPSILON: f64 = 1e-7;
/// Threshold for squared quantities (cross/dot products, squared lengths).
pub const EPSILON_SQUARED: f64 = EPSILON * EPSILON;

/// When false, `Point::get()` always allocates fresh storage and `put()`
/// just deallocates. Useful for ruling the pool out when chasing a bug.
pub const USE_POINT_POOL: bool = true;
/// Same switch for scratch pixel buffers.
pub const USE_BUFFER_POOL: bool = true;
/// Released point storage beyond this many free instances is dropped
/// rather than retained.
pub const POINT_POOL_MAX_FREE: usize = 4096;
