//! Response bodies of the redirect endpoint.

use serde::{Deserialize, Serialize};

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_serializes_fields() {
        let json = serde_json::to_value(ErrorResponse::new("LINK_NOT_FOUND", "Not found")).unwrap();
        assert_eq!(json["error_code"], "LINK_NOT_FOUND");
        assert_eq!(json["message"], "Not found");
    }
}
