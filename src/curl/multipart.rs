//! Multipart form-data field recovery
//!
//! Fields are found by matching the per-part `Content-Disposition` block
//! rather than splitting on the boundary. Payloads that match neither
//! pattern simply yield no fields.

use std::fmt;

use once_cell::sync::Lazy;
use regex::bytes::Regex;

/// Plain text part: disposition, blank line, value line
static FORM_FIELD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?-u)form-data; name="(.[^"]+)"\r\n\r\n(.+)\r\n"#)
        .expect("Invalid form field regex")
});

/// File part: disposition carrying a filename
static FILE_FIELD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?-u)form-data; name="(.[^"]+)"; filename="(.[^"]+)""#)
        .expect("Invalid file field regex")
});

/// One field recovered from a multipart payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultipartField {
    Text { name: String, value: String },
    File { name: String, filename: String },
}

impl MultipartField {
    /// The `-F` argument for this field
    pub fn to_arg(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MultipartField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MultipartField::Text { name, value } => write!(f, "-F '{}={}'", name, value),
            MultipartField::File { name, filename } => write!(f, "-F '{}=@{}'", name, filename),
        }
    }
}

/// Scan a raw multipart payload
///
/// All text fields come first, then all file fields, each group in payload
/// order. The relative byte position of a text field and a file field does
/// not affect the result.
pub fn scan(payload: &[u8]) -> Vec<MultipartField> {
    let text_fields = FORM_FIELD_RE
        .captures_iter(payload)
        .map(|caps| MultipartField::Text {
            name: decode(&caps[1]),
            value: decode(&caps[2]),
        });

    let file_fields = FILE_FIELD_RE
        .captures_iter(payload)
        .map(|caps| MultipartField::File {
            name: decode(&caps[1]),
            filename: decode(&caps[2]),
        });

    text_fields.chain(file_fields).collect()
}

/// `-F` arguments for every field in `payload`
pub fn multipart_args(payload: &[u8]) -> Vec<String> {
    scan(payload).iter().map(MultipartField::to_arg).collect()
}

fn decode(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}
