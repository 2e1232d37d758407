//! Wire types shared by backend implementations

use crate::error::{JourneyError, Result};
use serde::{Deserialize, Serialize};

/// Response envelope used by every REST endpoint:
/// `{"success": true, "data": ...}` or `{"success": false, "error": "..."}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Convert to a `Result`, requiring `data` on success
    pub fn into_result(self) -> Result<T> {
        if !self.success {
            return Err(JourneyError::Backend(
                self.error.unwrap_or_else(|| "request failed".to_string()),
            ));
        }
        self.data
            .ok_or_else(|| JourneyError::InvalidResponse("success response without data".into()))
    }

    /// Convert to a `Result` for endpoints whose success carries no data
    pub fn into_unit(self) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            Err(JourneyError::Backend(
                self.error.unwrap_or_else(|| "request failed".to_string()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope() {
        let envelope: ApiEnvelope<Vec<u32>> =
            serde_json::from_str(r#"{"success": true, "data": [1, 2]}"#).unwrap();
        assert_eq!(envelope.into_result().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_failure_envelope() {
        let envelope: ApiEnvelope<Vec<u32>> =
            serde_json::from_str(r#"{"success": false, "error": "x"}"#).unwrap();
        match envelope.into_result() {
            Err(JourneyError::Backend(message)) => assert_eq!(message, "x"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_success_without_data_is_invalid() {
        let envelope: ApiEnvelope<Vec<u32>> = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(matches!(envelope.into_result(), Err(JourneyError::InvalidResponse(_))));

        let envelope: ApiEnvelope<serde_json::Value> =
            serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(envelope.into_unit().is_ok());
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct Created {
        id: String,
    }

    #[test]
    fn test_envelope_data_needs_no_default() {
        let envelope: ApiEnvelope<Created> =
            serde_json::from_str(r#"{"success": true, "data": {"id": "m-1"}}"#).unwrap();
        assert_eq!(envelope.into_result().unwrap(), Created { id: "m-1".into() });

        let envelope: ApiEnvelope<Created> =
            serde_json::from_str(r#"{"success": false, "error": "x"}"#).unwrap();
        assert!(matches!(envelope.into_result(), Err(JourneyError::Backend(_))));
    }

    #[test]
    fn test_serialized_failure_omits_data() {
        let json = serde_json::to_string(&ApiEnvelope::<u32>::err("nope")).unwrap();
        assert_eq!(json, r#"{"success":false,"error":"nope"}"#);
    }
}
