//! # mapval-core — Document Value Model
//!
//! Foundation crate for mapval. Defines the dynamically-typed values that
//! documents are made of and the vocabulary rules use to describe them.
//!
//! ## Modules
//!
//! - [`value`]: [`Value`], [`Number`], [`Document`], [`FileUpload`].
//! - [`kind`]: the closed [`Kind`] enum and [`Provenance`].
//! - [`coerce`]: all cross-numeric coercion, in one place.
//! - [`sniff`]: image and markup predicates with no validation state.
//!
//! ## Crate Policy
//!
//! - Sits at the bottom of the dependency DAG.
//! - No validation logic lives here; only values and predicates over them.

pub mod coerce;
pub mod error;
pub mod kind;
pub mod sniff;
pub mod value;

pub use error::FileRejection;
pub use kind::{Kind, Provenance};
pub use sniff::{FileConstraints, FileType, ImageType};
pub use value::{Document, FileUpload, Number, Value};

/// Boxed error returned by user-supplied callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A document together with the provenance of its values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Payload {
    pub document: Document,
    pub provenance: Provenance,
}

impl Payload {
    pub fn new(document: Document, provenance: Provenance) -> Self {
        Self {
            document,
            provenance,
        }
    }

    /// A document built in code.
    pub fn native(document: Document) -> Self {
        Self::new(document, Provenance::Native)
    }
}
