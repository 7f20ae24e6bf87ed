use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A source attached to a notebook, mirrored from the backend.
///
/// `public_id` plus `format` form the delete key on the server; every
/// other mutation addresses the record by `public_id` alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    pub public_id: String,
    pub title: String,
    #[serde(default)]
    pub url: String,
    pub format: FileFormat,
    pub checked: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for importing link sources. Discovered candidates carry a
/// description for display, but the backend schema has no such field,
/// so this type cannot represent one.
#[derive(Debug, Clone, Serialize)]
pub struct ImportSource {
    pub public_id: String,
    pub title: String,
    pub url: String,
    pub format: FileFormat,
    pub checked: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FileFormat {
    Pdf,
    Docx,
    Pptx,
    Txt,
    Md,
    Csv,
    Json,
    Url,
    Other(String),
}

impl FileFormat {
    /// Link sources open in the browser directly; anything else is a
    /// stored document served through the download endpoint.
    pub fn is_link(&self) -> bool {
        matches!(self, FileFormat::Url)
    }

    pub fn as_str(&self) -> &str {
        match self {
            FileFormat::Pdf => "pdf",
            FileFormat::Docx => "docx",
            FileFormat::Pptx => "pptx",
            FileFormat::Txt => "txt",
            FileFormat::Md => "md",
            FileFormat::Csv => "csv",
            FileFormat::Json => "json",
            FileFormat::Url => "url",
            FileFormat::Other(s) => s,
        }
    }

    /// Guess a format from a file name's extension, for uploads.
    pub fn from_file_name(name: &str) -> Self {
        let ext = name.rsplit('.').next().unwrap_or_default().to_lowercase();
        FileFormat::from(ext)
    }
}

impl From<String> for FileFormat {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pdf" => FileFormat::Pdf,
            "docx" => FileFormat::Docx,
            "pptx" => FileFormat::Pptx,
            "txt" => FileFormat::Txt,
            "md" => FileFormat::Md,
            "csv" => FileFormat::Csv,
            "json" => FileFormat::Json,
            "url" => FileFormat::Url,
            _ => FileFormat::Other(s),
        }
    }
}

impl From<FileFormat> for String {
    fn from(f: FileFormat) -> Self {
        f.as_str().to_string()
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
