//! # mapval-rules — Rule Model
//!
//! Declarative per-field constraints for mapval documents.
//!
//! ## Modules
//!
//! - [`rule`]: [`Rule`], its [`Shape`], and modifiers.
//! - [`rule_set`]: [`RuleSet`], its builder, [`Setting`], [`Manipulator`],
//!   and the shared [`RuleSetRef`] handle used for nesting.
//! - [`messages`]: [`CustomMessages`] templates and placeholder rendering.
//! - [`descriptor`]: rule sets loaded from YAML or JSON.
//!
//! ## Crate Policy
//!
//! - Rule sets are built once and shared. Nothing here holds state for a
//!   single validation call.
//! - Building an empty rule set through [`RuleSetBuilder::build`] panics;
//!   every other failure is a [`RuleError`].

pub mod descriptor;
pub mod error;
pub mod messages;
pub mod rule;
pub mod rule_set;

pub use descriptor::{RuleDescriptor, RuleSetDescriptor};
pub use error::RuleError;
pub use messages::{CustomMessages, Placeholders};
pub use rule::{EnumSet, Ipv4Form, Rule, Shape};
pub use rule_set::{Manipulator, RuleSet, RuleSetBuilder, RuleSetRef, Setting};
