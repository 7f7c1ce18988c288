use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::string_utils::deserialize_optional_string;

/// 프로필 부분 수정. 보낸 필드만 바뀝니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 50, message = "User name must be at most 50 characters"))]
    pub user_name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub img_url: Option<String>,

    /// 있으면 새 해시로 교체됩니다.
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub password: Option<String>,
}

impl UpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.user_name.is_none()
            && self.img_url.is_none()
            && self.password.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPasswordRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_partial_fields() {
        let request: UpdateUserRequest =
            serde_json::from_str(r#"{"userName": "Noa", "imgUrl": ""}"#).unwrap();

        assert_eq!(request.user_name.as_deref(), Some("Noa"));
        assert!(request.img_url.is_none());
        assert!(!request.is_empty());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_update_request_empty() {
        let request: UpdateUserRequest = serde_json::from_str("{}").unwrap();
        assert!(request.is_empty());
    }

    #[test]
    fn test_verify_password_requires_value() {
        let request: VerifyPasswordRequest = serde_json::from_str("{}").unwrap();
        assert!(request.validate().is_err());
    }
}
