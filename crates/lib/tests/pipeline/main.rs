//! End-to-end tests for the style and script pipelines using the real engines.

mod common;
mod remote_tests;
mod scripts_tests;
mod styles_tests;
