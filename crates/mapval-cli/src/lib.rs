//! # mapval-cli — Command Line
//!
//! Subcommands live in their own modules and expose `run_*` functions that
//! return the process exit code:
//!
//! - [`check`]: validate a JSON document against a rule descriptor.
//! - [`serve`]: serve a rule descriptor over HTTP.

pub mod check;
pub mod serve;
