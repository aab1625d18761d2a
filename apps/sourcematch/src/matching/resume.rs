use std::path::Path;

use bytes::Bytes;
use tracing::warn;

use crate::errors::ClientError;

/// Largest resume accepted for upload.
pub const MAX_RESUME_BYTES: usize = 10 * 1024 * 1024;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

const PLACEHOLDER_FILE_NAME: &str = "resume.txt";
const PLACEHOLDER_CONTENT_TYPE: &str = "text/plain";
const PLACEHOLDER_BODY: &str = "No resume uploaded";

/// An uploaded resume: raw bytes plus the name and content type sent with them.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeArtifact {
    file_name: String,
    content_type: String,
    content: Bytes,
}

impl ResumeArtifact {
    /// Validates size and presence. Non-PDF content is accepted with a warning.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Result<Self, ClientError> {
        let file_name = file_name.into();
        let content_type = content_type.into();
        let content = content.into();

        if file_name.trim().is_empty() {
            return Err(ClientError::Validation("Resume file name is missing".to_string()));
        }
        if content.is_empty() {
            return Err(ClientError::Validation(format!("{file_name} is empty")));
        }
        check_size(&file_name, content.len())?;
        if content_type != PDF_CONTENT_TYPE {
            warn!("{file_name} is {content_type}, expected {PDF_CONTENT_TYPE}");
        }

        Ok(Self {
            file_name,
            content_type,
            content,
        })
    }

    /// Reads a resume from disk, inferring the content type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        // Refuse oversized files before reading them into memory.
        let size = tokio::fs::metadata(path).await?.len();
        check_size(&file_name, usize::try_from(size).unwrap_or(usize::MAX))?;

        let content = tokio::fs::read(path).await?;
        Self::new(file_name, content_type_for(path), content)
    }

    /// Minimal text file sent when applying without a prior upload.
    pub fn placeholder() -> Self {
        Self {
            file_name: PLACEHOLDER_FILE_NAME.to_string(),
            content_type: PLACEHOLDER_CONTENT_TYPE.to_string(),
            content: Bytes::from_static(PLACEHOLDER_BODY.as_bytes()),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn is_pdf(&self) -> bool {
        self.content_type == PDF_CONTENT_TYPE
    }
}

fn check_size(file_name: &str, size: usize) -> Result<(), ClientError> {
    if size > MAX_RESUME_BYTES {
        return Err(ClientError::Validation(format!(
            "{file_name} is larger than the 10 MB upload limit"
        )));
    }
    Ok(())
}

fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => PDF_CONTENT_TYPE,
        "txt" => "text/plain",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}
