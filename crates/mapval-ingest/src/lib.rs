//! # mapval-ingest — Ingestion Adapters
//!
//! Turn external input into a [`mapval_core::Payload`]: a document plus the
//! provenance the engine needs for numeric coercion.
//!
//! - [`load_json`] / [`load_json_reader`]: JSON object bodies (decoded).
//! - [`load_map`]: documents built in code (native).
//! - [`load_form`]: form fields typed from the rule set (form).
//!
//! An empty body ([`IngestError::NoData`]) and a malformed one
//! ([`IngestError::InvalidJson`]) are reported separately.

pub mod error;
pub mod form;
pub mod json;

pub use error::IngestError;
pub use form::{load_form, FormFields, FormSource};
pub use json::{load_json, load_json_reader, load_map};
