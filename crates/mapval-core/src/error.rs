//! # Error Types
//!
//! Errors produced by the content-sniffing helpers. The display strings are
//! user-facing and returned unchanged through validation results.

use thiserror::Error;

/// An uploaded file failed its [`crate::FileConstraints`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FileRejection {
    /// Upload exceeds the configured size.
    #[error("file size is too large, maximal {max_mb} MB")]
    TooLarge { max_mb: u64 },

    /// Content is not a recognized image.
    #[error("file type is not valid image file")]
    NotImage,

    /// An image was required to be JPEG.
    #[error("image file must be jpeg format")]
    NotJpeg,

    /// An image was required to be PNG.
    #[error("image file must be png format")]
    NotPng,
}
