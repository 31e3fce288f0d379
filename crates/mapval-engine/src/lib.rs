//! # mapval-engine — Validation Engine
//!
//! Validates loosely-typed documents against a [`mapval_rules::RuleSet`].
//!
//! ## Components
//!
//! - [`tree`]: the tracking tree built during a call.
//! - `engine` / `check`: recursive per-field evaluation.
//! - `resolve`: presence dependencies and sibling uniqueness.
//! - `mutate`: the manipulator pass.
//! - [`materialize`]: [`Validated`] results and serde binding.
//! - [`validator`]: the [`Validator`] entry point and [`Extension`] hooks.
//!
//! ## Example
//!
//! ```
//! use mapval_core::doc;
//! use mapval_engine::Validator;
//! use mapval_rules::{Rule, RuleSet};
//!
//! let rules = RuleSet::builder()
//!     .rule("host", Rule::string().max(64))
//!     .rule("port", Rule::enumeration([80, 443]))
//!     .build();
//! let validator = Validator::new(rules);
//!
//! let ok = validator.validate_document(doc! { "host" => "example.org", "port" => 443 });
//! assert!(ok.is_ok());
//!
//! let err = validator.validate_document(doc! { "host" => "example.org" }).unwrap_err();
//! assert_eq!(err.to_string(), "we need 'port' field");
//! ```

mod check;
mod engine;
pub mod error;
mod evaluation;
pub mod materialize;
mod mutate;
mod resolve;
pub mod tree;
pub mod validator;

pub use error::{BindError, ValidationError, Violation, ViolationKind};
pub use materialize::Validated;
pub use tree::{NodeId, TrackingNode, TrackingTree};
pub use validator::{validate_one, Extension, Validator};
