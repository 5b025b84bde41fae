use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{LocalValidationError, ValidationKind};

/// Maximum number of files accepted in one import.
pub const MAX_FILES_PER_IMPORT: usize = 100;

/// File extension every fiscal document must carry (compared case-insensitively).
pub const DOCUMENT_EXTENSION: &str = "xml";

/// A fiscal document selected for import: its name and raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFile {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl DocumentFile {
    pub fn new(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }

    /// Whether the file name ends in `.xml`, any case.
    pub fn has_document_extension(&self) -> bool {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(DOCUMENT_EXTENSION))
    }
}

/// A validated import request: 1 to [`MAX_FILES_PER_IMPORT`] `.xml` files for one company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBatchRequest {
    company_id: String,
    files: Vec<DocumentFile>,
}

impl ImportBatchRequest {
    /// Validate and build a request. Nothing here touches the network.
    pub fn new(
        company_id: impl Into<String>,
        files: Vec<DocumentFile>,
    ) -> Result<Self, LocalValidationError> {
        let company_id = company_id.into();
        if company_id.trim().is_empty() {
            return Err(LocalValidationError::new(
                ValidationKind::MissingField,
                "company_id",
                "company is required",
            ));
        }
        if files.is_empty() {
            return Err(LocalValidationError::new(
                ValidationKind::NoFiles,
                "files",
                "select at least one file",
            ));
        }
        if files.len() > MAX_FILES_PER_IMPORT {
            return Err(LocalValidationError::new(
                ValidationKind::TooManyFiles,
                "files",
                format!(
                    "at most {MAX_FILES_PER_IMPORT} files per import, got {}",
                    files.len()
                ),
            ));
        }
        if let Some((idx, file)) = files
            .iter()
            .enumerate()
            .find(|(_, f)| !f.has_document_extension())
        {
            return Err(LocalValidationError::new(
                ValidationKind::InvalidExtension,
                format!("files[{idx}]"),
                format!("'{}' is not a .{DOCUMENT_EXTENSION} file", file.file_name),
            ));
        }

        Ok(Self { company_id, files })
    }

    pub fn company_id(&self) -> &str {
        &self.company_id
    }

    pub fn files(&self) -> &[DocumentFile] {
        &self.files
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xml(name: &str) -> DocumentFile {
        DocumentFile::new(name, b"<NFSe/>".to_vec())
    }

    #[test]
    fn accepts_upper_case_extension() {
        assert!(xml("NOTA.XML").has_document_extension());
        assert!(!xml("nota.xml.pdf").has_document_extension());
        assert!(!xml("xml").has_document_extension());
    }

    #[test]
    fn rejects_empty_selection() {
        let err = ImportBatchRequest::new("1", vec![]).unwrap_err();
        assert_eq!(err.kind, ValidationKind::NoFiles);
    }

    #[test]
    fn rejects_more_than_limit() {
        let files = (0..=MAX_FILES_PER_IMPORT).map(|i| xml(&format!("{i}.xml"))).collect();
        let err = ImportBatchRequest::new("1", files).unwrap_err();
        assert_eq!(err.kind, ValidationKind::TooManyFiles);
    }

    #[test]
    fn accepts_exactly_limit() {
        let files = (0..MAX_FILES_PER_IMPORT).map(|i| xml(&format!("{i}.xml"))).collect();
        assert!(ImportBatchRequest::new("1", files).is_ok());
    }

    #[test]
    fn reports_first_bad_extension() {
        let err = ImportBatchRequest::new("1", vec![xml("a.xml"), xml("b.pdf"), xml("c.txt")])
            .unwrap_err();
        assert_eq!(err.kind, ValidationKind::InvalidExtension);
        assert_eq!(err.field, "files[1]");
    }

    #[test]
    fn requires_company() {
        let err = ImportBatchRequest::new(" ", vec![xml("a.xml")]).unwrap_err();
        assert_eq!(err.kind, ValidationKind::MissingField);
    }
}
