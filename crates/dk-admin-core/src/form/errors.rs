use crate::client::RequestError;
use crate::errors::AdminError;

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("Required fields missing: {}", .fields.join(", "))]
    MissingRequired { fields: Vec<String> },

    #[error("Field '{field}' expects a number, got '{value}'")]
    InvalidNumber { field: String, value: String },

    #[error("Field '{field}' must be one of {}, got '{value}'", .allowed.join(", "))]
    InvalidChoice {
        field: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("Unknown field '{field}'")]
    UnknownField { field: String },

    #[error("Field '{field}' cannot be changed while editing")]
    FieldLocked { field: String },

    #[error("Row {index} does not exist")]
    RowOutOfRange { index: usize },

    #[error("Failed to read record into the form: {message}")]
    Encode { message: String },

    #[error(transparent)]
    Request {
        #[from]
        source: RequestError,
    },
}

impl FormError {
    /// Raised before any network call.
    pub fn is_validation(&self) -> bool {
        !matches!(self, FormError::Request { .. } | FormError::Encode { .. })
    }
}

impl AdminError for FormError {
    fn error_code(&self) -> &'static str {
        match self {
            FormError::MissingRequired { .. } => "MISSING_REQUIRED_FIELDS",
            FormError::InvalidNumber { .. } => "INVALID_NUMBER",
            FormError::InvalidChoice { .. } => "INVALID_CHOICE",
            FormError::UnknownField { .. } => "UNKNOWN_FIELD",
            FormError::FieldLocked { .. } => "FIELD_LOCKED",
            FormError::RowOutOfRange { .. } => "ROW_OUT_OF_RANGE",
            FormError::Encode { .. } => "FORM_ENCODE_ERROR",
            FormError::Request { source } => source.error_code(),
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            FormError::Request { source } => source.is_user_error(),
            FormError::Encode { .. } => false,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Method;

    #[test]
    fn test_missing_required_lists_fields() {
        let error = FormError::MissingRequired {
            fields: vec!["model".to_string(), "slug".to_string()],
        };
        assert_eq!(error.to_string(), "Required fields missing: model, slug");
        assert_eq!(error.error_code(), "MISSING_REQUIRED_FIELDS");
        assert!(error.is_user_error());
        assert!(error.is_validation());
    }

    #[test]
    fn test_request_error_delegates_code() {
        let error = FormError::from(RequestError::Status {
            method: Method::Post,
            path: "/admin/cpus".to_string(),
            status: 409,
            message: "Slug already exists".to_string(),
        });
        assert_eq!(error.error_code(), "BACKEND_STATUS_ERROR");
        assert!(error.is_user_error());
        assert!(!error.is_validation());
    }
}
