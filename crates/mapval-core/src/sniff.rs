//! # Content Sniffing
//!
//! Standalone predicates over raw content. None of them touch the tracking
//! tree; rules call into them for file and markup checks.
//!
//! - [`detect_image`] recognizes JPEG and PNG by their leading magic bytes.
//! - [`check_file`] applies [`FileConstraints`] to an upload.
//! - [`is_suspicious_markup`] flags script-like markup in free text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::FileRejection;
use crate::value::FileUpload;

const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Image formats recognized by [`detect_image`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageType {
    Jpeg,
    Png,
}

/// Content classes a file rule may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// Any recognized image format.
    Image,
    Jpeg,
    Png,
}

/// Constraints checked against an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileConstraints {
    /// Every listed type must be satisfied.
    #[serde(default)]
    pub allowed_types: Vec<FileType>,
    /// Upper bound on the upload size in megabytes.
    #[serde(default)]
    pub max_mb: Option<u64>,
}

impl FileConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow(mut self, file_type: FileType) -> Self {
        self.allowed_types.push(file_type);
        self
    }

    pub fn max_mb(mut self, max_mb: u64) -> Self {
        self.max_mb = Some(max_mb);
        self
    }
}

/// Detect the image format of `bytes` from its signature.
pub fn detect_image(bytes: &[u8]) -> Option<ImageType> {
    if bytes.starts_with(JPEG_MAGIC) {
        Some(ImageType::Jpeg)
    } else if bytes.starts_with(PNG_MAGIC) {
        Some(ImageType::Png)
    } else {
        None
    }
}

/// Apply `constraints` to `upload`. Size is checked before content.
pub fn check_file(upload: &FileUpload, constraints: &FileConstraints) -> Result<(), FileRejection> {
    if let Some(max_mb) = constraints.max_mb {
        if upload.size() as u64 > max_mb.saturating_mul(BYTES_PER_MB) {
            return Err(FileRejection::TooLarge { max_mb });
        }
    }

    for required in &constraints.allowed_types {
        let detected = detect_image(&upload.bytes).ok_or(FileRejection::NotImage)?;
        match (required, detected) {
            (FileType::Jpeg, ImageType::Png) => return Err(FileRejection::NotJpeg),
            (FileType::Png, ImageType::Jpeg) => return Err(FileRejection::NotPng),
            _ => {}
        }
    }
    Ok(())
}

// ─── Markup detection ────────────────────────────────────────────────

const MARKUP_PATTERNS: &[&str] = &[
    r"(?i)<script.*?>.*?</script>",
    r"(?i)<iframe.*?>.*?</iframe>",
    r"(?i)<object.*?>.*?</object>",
    r"(?i)<embed.*?>.*?</embed>",
    r"(?i)<svg.*?>.*?</svg>",
    r"(?i)<img.*?src.*?=.*?>",
    r#"(?i)<a.*?href="javascript:.*?>.*?</a>"#,
    r"(?i)onerror",
    r"(?i)onload",
    r"(?i)alert\(",
    r#"[\s"'`;/0-9]\b(alert|prompt|confirm|fetch|eval|new Function)\s*\("#,
    r"(?i)style\s*=.*?expression|url\s*\(",
    r#"(?i)style\s*=['"].*?behavior:\s*url"#,
    r"(?i)<style.*?>.*?</style>",
    r#"(?i)@import\s+['"].*?;"#,
    r"(?i)<meta.*?refresh.*?>",
    r#"(?i)<link.*?rel=['"]?stylesheet['"]?.*?>"#,
    r"(?i)(base64|eval|atob|btoa|decodeURIComponent|encodeURIComponent)\(",
    r#"(?i)\.innerhtml\s*=\s*['"].*?<script"#,
    r#"(?i)\.outerhtml\s*=\s*['"].*?<script"#,
    r"(?i)\.addEventListener\s*\(",
    r"(?i)<canvas.*?>.*?</canvas>",
    r#"(?i)\.getContext\s*\(\s*['"]webgl['"]\s*\)"#,
    r"(?i)\.shaderSource\s*\(.*?,",
    r"(?i)<template.*?>.*?</template>",
    r"(?i)String\.fromCharCode\s*\(.*?\)",
    r#"(?i)eval\s*\(['"].*?['"]\s*\)"#,
    r#"(?i)this\.alert\s*\(['"].*?['"]\)"#,
    r"(?i)window\.name",
    r#"(?i)<div style=".*?:\s*(expression|url|attr|behavior|moz-binding|moz-xxx|webkit-xxx)\(.*?\);?">"#,
];

static MARKUP_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    MARKUP_PATTERNS
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .collect()
});

/// Whether `input` looks like it carries script-capable markup.
pub fn is_suspicious_markup(input: &str) -> bool {
    MARKUP_REGEXES.iter().any(|re| re.is_match(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png() -> Vec<u8> {
        let mut bytes = PNG_MAGIC.to_vec();
        bytes.extend_from_slice(&[0, 0, 0, 13]);
        bytes
    }

    fn jpeg() -> Vec<u8> {
        vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]
    }

    #[test]
    fn test_detect_image() {
        assert_eq!(detect_image(&png()), Some(ImageType::Png));
        assert_eq!(detect_image(&jpeg()), Some(ImageType::Jpeg));
        assert_eq!(detect_image(b"GIF89a"), None);
        assert_eq!(detect_image(&[]), None);
    }

    #[test]
    fn test_check_file_type_constraints() {
        let png_rule = FileConstraints::new().allow(FileType::Png);
        let upload = FileUpload::new("a.jpg", jpeg());
        let err = check_file(&upload, &png_rule).unwrap_err();
        assert_eq!(err.to_string(), "image file must be png format");

        let jpeg_rule = FileConstraints::new().allow(FileType::Jpeg);
        let err = check_file(&FileUpload::new("a.png", png()), &jpeg_rule).unwrap_err();
        assert_eq!(err.to_string(), "image file must be jpeg format");

        let image_rule = FileConstraints::new().allow(FileType::Image);
        assert!(check_file(&FileUpload::new("a.png", png()), &image_rule).is_ok());
        let err = check_file(&FileUpload::new("a.txt", b"hello".to_vec()), &image_rule)
            .unwrap_err();
        assert_eq!(err.to_string(), "file type is not valid image file");
    }

    #[test]
    fn test_check_file_size() {
        let rule = FileConstraints::new().max_mb(1);
        let small = FileUpload::new("a.bin", vec![0_u8; 1024]);
        assert!(check_file(&small, &rule).is_ok());
        let large = FileUpload::new("b.bin", vec![0_u8; 1024 * 1024 + 1]);
        assert_eq!(
            check_file(&large, &rule).unwrap_err().to_string(),
            "file size is too large, maximal 1 MB"
        );
    }

    #[test]
    fn test_markup_detection() {
        let flagged = [
            "<script>alert('XSS')</script>",
            "<img src='x' onerror='alert(1)'>",
            "<div style=\"behavior:url(#default#VML);\">",
            "<a href=\"javascript:alert('XSS')\">Click me</a>",
            "<iframe src=\"http://example.com\"></iframe>",
            "<svg onload=\"alert('XSS')\"></svg>",
        ];
        for input in flagged {
            assert!(is_suspicious_markup(input), "expected {input:?} to be flagged");
        }

        for input in ["<div>Safe content</div>", "Hello, world!", "<b>Bold text</b>"] {
            assert!(!is_suspicious_markup(input), "expected {input:?} to pass");
        }
    }
}
