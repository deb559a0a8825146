//! assetpipe-lib: cached style and script compilation
//!
//! This crate turns a source stylesheet or script (local path or remote URL)
//! into a versioned, cached output artifact:
//! - `resolve`: local paths and remote mirrors
//! - `fingerprint`: cheap staleness signals for source trees and variables
//! - `naming`: deterministic artifact file names
//! - `store`: the flat artifact directory (atomic writes, pruning)
//! - `compile`: SCSS compilation and JS minification adapters
//! - `pipeline`: the `Styles` and `Scripts` orchestrators

pub mod compile;
pub mod config;
pub mod consts;
pub mod fingerprint;
pub mod hooks;
pub mod host;
pub mod naming;
pub mod pipeline;
pub mod platform;
pub mod resolve;
pub mod store;
pub mod types;

#[cfg(test)]
pub mod util;
