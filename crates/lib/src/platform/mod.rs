//! Platform-specific directory lookup.

pub mod paths;
