//! Error types for the simple provider.

use thiserror::Error;

use crate::diagnostics::Diagnostic;

/// Errors raised while servicing a provider request.
///
/// None of these abort the provider. Operations turn them into error
/// diagnostics on the response (see [`From<ProviderError> for Diagnostic`]).
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The requested resource, data source or list type is not in the catalog.
    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    /// Raw state or identity bytes did not conform to the implied type.
    #[error("Decode error at '{path}': {message}")]
    Decode {
        /// Attribute path of the offending value (empty for the root).
        path: String,
        /// What was wrong with it.
        message: String,
    },

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A value had a shape the operation cannot project.
    #[error("Unexpected value: {0}")]
    UnexpectedValue(String),

    /// The operation is defined but refused by this provider.
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl ProviderError {
    /// Get the error message as a string.
    pub fn message(&self) -> &str {
        match self {
            Self::UnknownResource(msg) => msg,
            Self::Decode { message, .. } => message,
            Self::Serialization(_err) => "serialization error (see Debug output)",
            Self::UnexpectedValue(msg) => msg,
            Self::Unsupported(msg) => msg,
        }
    }

    pub(crate) fn decode(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl From<ProviderError> for Diagnostic {
    fn from(err: ProviderError) -> Self {
        let diagnostic = Diagnostic::error(err.to_string());
        match err {
            ProviderError::Decode { path, .. } if !path.is_empty() => {
                diagnostic.with_attribute(path)
            },
            _ => diagnostic,
        }
    }
}

impl From<ProviderError> for tonic::Status {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::UnknownResource(msg) => tonic::Status::not_found(msg),
            ProviderError::Decode { path, message } => {
                tonic::Status::invalid_argument(format!("{}: {}", path, message))
            },
            ProviderError::Serialization(err) => {
                tonic::Status::invalid_argument(format!("Serialization error: {}", err))
            },
            ProviderError::UnexpectedValue(msg) => tonic::Status::invalid_argument(msg),
            ProviderError::Unsupported(msg) => tonic::Status::unimplemented(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticSeverity;

    #[test]
    fn test_error_display() {
        let err = ProviderError::UnknownResource("custom_resource".to_string());
        assert_eq!(format!("{}", err), "Unknown resource type: custom_resource");

        let err = ProviderError::Unsupported("import".to_string());
        assert_eq!(format!("{}", err), "Unsupported: import");

        let err = ProviderError::decode("value", "expected string, got number");
        assert_eq!(
            format!("{}", err),
            "Decode error at 'value': expected string, got number"
        );
    }

    #[test]
    fn test_error_to_status() {
        let status: tonic::Status = ProviderError::UnknownResource("x".into()).into();
        assert_eq!(status.code(), tonic::Code::NotFound);

        let status: tonic::Status = ProviderError::decode("id", "bad").into();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);

        let status: tonic::Status = ProviderError::Unsupported("move".into()).into();
        assert_eq!(status.code(), tonic::Code::Unimplemented);
    }

    #[test]
    fn test_serialization_error_from() {
        let json_err = serde_json::from_slice::<serde_json::Value>(b"{not json").unwrap_err();
        let err: ProviderError = json_err.into();
        assert!(matches!(err, ProviderError::Serialization(_)));

        let status: tonic::Status = err.into();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
    }

    #[test]
    fn test_message_method() {
        let err = ProviderError::UnknownResource("other_resource".to_string());
        assert_eq!(err.message(), "other_resource");

        let err = ProviderError::decode("value", "not a string");
        assert_eq!(err.message(), "not a string");
    }

    #[test]
    fn test_error_to_diagnostic() {
        let diag: Diagnostic = ProviderError::decode("value", "not a string").into();
        assert_eq!(diag.severity, DiagnosticSeverity::Error);
        assert_eq!(diag.attribute.as_deref(), Some("value"));

        let diag: Diagnostic = ProviderError::decode("", "expected object").into();
        assert!(diag.attribute.is_none());

        let diag: Diagnostic = ProviderError::Unsupported("import".into()).into();
        assert_eq!(diag.summary, "Unsupported: import");
    }
}
