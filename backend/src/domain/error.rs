//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses; the domain only records a stable code, a short message, and
//! optional structured details.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable machine-readable error code describing the failure category.
///
/// The published API distinguishes two "absent resource" categories:
/// profile and resume-child lookups report [`ErrorCode::ResourceMissing`]
/// (HTTP 400) while post lookups report [`ErrorCode::NotFound`] (HTTP 404).
/// Both are kept so the published status codes stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails field validation.
    InvalidRequest,
    /// A profile, experience, education, or comment record is absent.
    ResourceMissing,
    /// Authentication failed, is missing, or the caller is not the owner.
    Unauthorized,
    /// The requested post does not exist.
    NotFound,
    /// The second phase of a two-step aggregate update failed after the
    /// first phase committed. The caller sees an error even though a child
    /// record exists, so the defect is visible rather than silent.
    LinkInconsistency,
    /// The storage layer itself is unreachable.
    ServiceUnavailable,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

/// Domain error payload.
///
/// # Examples
/// ```
/// use backend::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("Post not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Error {
    code: ErrorCode,
    #[serde(rename = "msg")]
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl Error {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary error details for adapters.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_request("validation failed")
    ///     .with_details(json!({ "errors": [] }));
    /// assert!(err.details().is_some());
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::ResourceMissing`].
    pub fn resource_missing(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceMissing, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::LinkInconsistency`].
    pub fn link_inconsistency(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::LinkInconsistency, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serialises_message_under_msg_key() {
        let err = Error::resource_missing("Profile not found");
        let value = serde_json::to_value(&err).expect("serialise");
        assert_eq!(value["msg"], "Profile not found");
        assert_eq!(value["code"], "resource_missing");
        assert!(value.get("details").is_none());
    }

    #[test]
    fn details_round_trip() {
        let err = Error::invalid_request("validation failed")
            .with_details(json!({ "errors": [{ "field": "status" }] }));
        let value = serde_json::to_value(&err).expect("serialise");
        assert_eq!(value["details"]["errors"][0]["field"], "status");
    }

    #[test]
    fn display_uses_message() {
        let err = Error::unauthorized("Token is not valid");
        assert_eq!(err.to_string(), "Token is not valid");
    }
}
