//! # Authentication Configuration
//!
//! JWT 서명 키/만료 시간과 Google 로그인 설정입니다.
//!
//! ```bash
//! export JWT_SECRET="access-token-secret"
//! export JWT_REFRESH_SECRET="refresh-token-secret"
//! export JWT_EXPIRATION_SECONDS="3600"
//! export JWT_REFRESH_EXPIRATION_DAYS="7"
//! export GOOGLE_CLIENT_ID="xxxx.apps.googleusercontent.com"
//! ```
//!
//! 액세스 토큰과 리프레시 토큰은 서로 다른 키로 서명되므로
//! 한 종류의 토큰을 다른 용도로 재사용할 수 없습니다.

use std::env;
use std::str::FromStr;

use super::data_config::env_or;

pub struct JwtConfig;

impl JwtConfig {
    /// 액세스 토큰 서명 키
    pub fn secret() -> String {
        env::var("JWT_SECRET").unwrap_or_else(|_| {
            log::warn!("JWT_SECRET not set, using default (not secure for production!)");
            "travel-share-access-secret".to_string()
        })
    }

    /// 리프레시 토큰 서명 키
    pub fn refresh_secret() -> String {
        env::var("JWT_REFRESH_SECRET").unwrap_or_else(|_| {
            log::warn!("JWT_REFRESH_SECRET not set, using default (not secure for production!)");
            "travel-share-refresh-secret".to_string()
        })
    }

    pub fn access_expiration_seconds() -> i64 {
        env_or("JWT_EXPIRATION_SECONDS", 3600)
    }

    pub fn refresh_expiration_days() -> i64 {
        env_or("JWT_REFRESH_EXPIRATION_DAYS", 7)
    }
}

/// Google ID 토큰 검증 설정
pub struct GoogleAuthConfig;

impl GoogleAuthConfig {
    /// 설정되지 않으면 audience 검증 없이 Google 응답만 신뢰합니다.
    pub fn client_id() -> Option<String> {
        env::var("GOOGLE_CLIENT_ID").ok().filter(|id| !id.trim().is_empty())
    }

    pub fn token_info_uri() -> String {
        env::var("GOOGLE_TOKEN_INFO_URI")
            .unwrap_or_else(|_| "https://oauth2.googleapis.com/tokeninfo".to_string())
    }

    pub fn request_timeout_seconds() -> u64 {
        env_or("GOOGLE_REQUEST_TIMEOUT_SECONDS", 10)
    }
}

/// 계정이 만들어진 경로
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Local,
    Google,
}

impl AuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Local => "local",
            AuthProvider::Google => "google",
        }
    }
}

impl FromStr for AuthProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(AuthProvider::Local),
            "google" => Ok(AuthProvider::Google),
            _ => Err(format!("Unsupported auth provider: {}", s)),
        }
    }
}
