use serde::{Deserialize, Serialize};

/// Body of `POST /respond`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RespondRequest {
    /// Caller identity. Only logged; reserved for per-user memory.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Message text from the user.
    pub message: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// JSON body returned when a request fails after validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_respond_request_without_user_id() {
        let json = r#"{"message":"hello"}"#;
        let req: RespondRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.message, "hello");
        assert!(req.user_id.is_none());
    }

    #[test]
    fn test_respond_request_with_user_id() {
        let json = r#"{"user_id":"u-42","message":"hi"}"#;
        let req: RespondRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.user_id.as_deref(), Some("u-42"));
    }

    #[test]
    fn test_respond_request_requires_message() {
        let json = r#"{"user_id":"u-42"}"#;
        assert!(serde_json::from_str::<RespondRequest>(json).is_err());
    }

    #[test]
    fn test_health_shape() {
        let json = serde_json::to_value(HealthResponse::ok()).unwrap();
        assert_eq!(json, serde_json::json!({"status": "ok"}));
    }
}
