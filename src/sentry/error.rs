//! Errors surfaced to callers as an error flag plus text

use super::client::ApiError;

/// Failure of one remote-callable operation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolError {
    /// The Sentry API call failed or returned a non-success status
    #[error("Error in {operation}: {message}")]
    Upstream { operation: String, message: String },

    /// A caller-supplied argument is structurally invalid
    #[error("Invalid argument: {0}")]
    Validation(String),

    /// The identifier did not resolve to a resource
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },
}

impl ToolError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Classify a failed API call
    ///
    /// Errors that already are a `ToolError` pass through, HTTP 404 becomes
    /// [`ToolError::NotFound`] and everything else is upstream.
    pub fn from_api(operation: &str, resource: &str, id: &str, err: anyhow::Error) -> Self {
        if let Some(tool_err) = err.downcast_ref::<ToolError>() {
            return tool_err.clone();
        }
        if let Some(ApiError::Status { status: 404, .. }) = err.downcast_ref::<ApiError>() {
            return Self::NotFound {
                resource: resource.to_string(),
                id: id.to_string(),
            };
        }
        Self::Upstream {
            operation: operation.to_string(),
            message: format!("{:#}", err),
        }
    }
}
