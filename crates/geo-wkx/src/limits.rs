//! Security limits for reading untrusted input.
//!
//! Input size is the caller's business; these constants only guard against
//! inputs that would otherwise exhaust the stack.

/// Maximum nesting depth of geometries inside geometries.
///
/// The top-level geometry is depth 0. A point inside a multi-point inside a
/// geometry collection is depth 2.
pub const MAX_NESTING_DEPTH: usize = 64;
