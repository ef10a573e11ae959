use std::fmt;

/// Document type shown before the user picks one.
pub const PLACEHOLDER_DOCUMENT_TYPE: &str = "Select";

/// Contents of the document load form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentForm {
    pub document_type: String,
    pub document_info: String,
    pub upload_path: String,
    pub terms_accepted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormError {
    DocumentTypeNotSelected,
    MissingDocumentInfo,
    TermsNotAccepted,
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::DocumentTypeNotSelected => write!(f, "please select a document type"),
            FormError::MissingDocumentInfo => write!(f, "please provide document information"),
            FormError::TermsNotAccepted => write!(f, "please accept the terms and conditions"),
        }
    }
}

impl DocumentForm {
    /// Checks the form in the order the user sees the fields.
    pub fn validate(&self) -> Result<(), FormError> {
        let document_type = self.document_type.trim();
        if document_type.is_empty() || document_type == PLACEHOLDER_DOCUMENT_TYPE {
            return Err(FormError::DocumentTypeNotSelected);
        }
        if self.document_info.trim().is_empty() {
            return Err(FormError::MissingDocumentInfo);
        }
        if !self.terms_accepted {
            return Err(FormError::TermsNotAccepted);
        }
        Ok(())
    }
}
