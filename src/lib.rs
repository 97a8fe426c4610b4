//! Layered YAML configuration library
//!
//! Loads `{slug}.yml` files from prioritized directories (optionally with
//! per-environment variants), deep-merges them, validates the result against
//! a declarative schema, and can freeze the resolved values into a lock file.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
