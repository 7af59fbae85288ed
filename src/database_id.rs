//! The shared row ID type.

/// The integer type SQLite uses for row IDs.
pub type DatabaseId = i64;
