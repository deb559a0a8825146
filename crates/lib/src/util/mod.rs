//! Shared test helpers.

pub mod testutil;
