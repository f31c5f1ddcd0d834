//! Files attached to a user turn.

use std::fmt;
use std::path::Path;

use crate::error::{Result, VisaError};

/// File extensions the analyzer accepts for document uploads.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "pdf"];

/// A document (passport scan, visa page) attached to a user turn.
///
/// Attachments are shared between the message that displays them and the
/// request that uploads them, so the bytes are never copied per message.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    file_name: String,
    content_type: String,
    data: Vec<u8>,
}

impl Attachment {
    /// Creates an attachment from in-memory bytes.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// Reads an attachment from disk.
    ///
    /// The content type is inferred from the extension. Only the extensions
    /// in [`ACCEPTED_EXTENSIONS`] are allowed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(VisaError::attachment(
                display,
                format!(
                    "unsupported file type (accepted: {})",
                    ACCEPTED_EXTENSIONS.join(", ")
                ),
            ));
        }

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| VisaError::attachment(display.clone(), "missing file name"))?
            .to_string();

        let data = std::fs::read(path)
            .map_err(|e| VisaError::attachment(display.clone(), e.to_string()))?;

        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self {
            file_name,
            content_type,
            data,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns true for `image/*` content, which front ends may preview.
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}

// Bytes are omitted so attachments can be logged.
impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.data.len())
            .finish()
    }
}
