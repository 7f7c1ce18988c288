//! 인증 요청 DTO
//!
//! 필드가 빠진 요청도 역직렬화는 통과시키고(`#[serde(default)]`),
//! `validate()` 단계에서 400 으로 거절합니다.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::string_utils::deserialize_optional_string;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required"))]
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// 없으면 이메일 앞부분을 사용합니다.
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 50, message = "User name must be at most 50 characters"))]
    pub user_name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub img_url: Option<String>,
}

impl RegisterRequest {
    pub fn resolved_user_name(&self) -> String {
        self.user_name.clone().unwrap_or_else(|| {
            self.email
                .split('@')
                .next()
                .unwrap_or_default()
                .to_string()
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Google Identity Services 가 프론트엔드에 준 ID 토큰
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GoogleSignInRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Google credential is required"))]
    pub credential: String,
}
