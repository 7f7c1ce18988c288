//! # Google 로그인 검증 서비스
//!
//! 프론트엔드(Google Identity Services)가 받은 ID 토큰을 Google token-info
//! 엔드포인트로 검증합니다.
//!
//! ```text
//! 클라이언트 ── credential ──► POST /auth/google
//!                                   │
//!                                   ▼
//!              GET {GOOGLE_TOKEN_INFO_URI}?id_token=...
//!                                   │
//!                   aud == GOOGLE_CLIENT_ID, email 존재 확인
//!                                   │
//!                                   ▼
//!                        AuthService 가 사용자 조회/생성 후 토큰 발급
//! ```

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use once_cell::sync::OnceCell;

use crate::config::GoogleAuthConfig;
use crate::core::errors::AppError;
use crate::core::registry::{Service, ServiceRegistration};
use crate::domain::models::google::GoogleTokenInfo;

static GOOGLE_AUTH_SERVICE_INSTANCE: OnceCell<Arc<GoogleAuthService>> = OnceCell::new();

pub struct GoogleAuthService {
    http: reqwest::Client,
}

impl GoogleAuthService {
    pub fn instance() -> Arc<Self> {
        GOOGLE_AUTH_SERVICE_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    fn new() -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(GoogleAuthConfig::request_timeout_seconds()))
            .build()
            .unwrap_or_else(|e| {
                warn!("⚠️ HTTP 클라이언트 설정 실패, 기본 클라이언트 사용: {}", e);
                reqwest::Client::new()
            });

        Self { http }
    }

    /// ID 토큰을 검증하고 이메일이 보장된 토큰 정보를 반환합니다.
    pub async fn verify_id_token(&self, credential: &str) -> Result<GoogleTokenInfo, AppError> {
        let response = self
            .http
            .get(GoogleAuthConfig::token_info_uri())
            .query(&[("id_token", credential)])
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Google token-info request failed: {}", e)))?;

        let status = response.status();
        if status.is_client_error() {
            debug!("Google token-info 거절: {}", status);
            return Err(AppError::AuthenticationError("Invalid Google credential".to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "Google token-info returned {}: {}",
                status, body
            )));
        }

        let info = response
            .json::<GoogleTokenInfo>()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Google token-info parse failed: {}", e)))?;

        validate_token_info(info, GoogleAuthConfig::client_id().as_deref())
    }
}

/// audience 와 이메일 존재 여부를 확인합니다.
fn validate_token_info(
    info: GoogleTokenInfo,
    expected_client_id: Option<&str>,
) -> Result<GoogleTokenInfo, AppError> {
    if let Some(client_id) = expected_client_id {
        if info.aud != client_id {
            warn!("⚠️ Google 토큰 audience 불일치: {}", info.aud);
            return Err(AppError::AuthenticationError(
                "Google credential was issued for another client".to_string(),
            ));
        }
    }

    match info.email.as_deref().map(str::trim) {
        Some(email) if !email.is_empty() => Ok(info),
        _ => Err(AppError::AuthenticationError(
            "Google account has no email".to_string(),
        )),
    }
}

impl Service for GoogleAuthService {
    fn name(&self) -> &str {
        "google_auth_service"
    }
}

fn google_auth_service_constructor() -> Arc<dyn Service> {
    GoogleAuthService::instance()
}

inventory::submit! {
    ServiceRegistration {
        name: "google_auth_service",
        constructor: google_auth_service_constructor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(aud: &str, email: Option<&str>) -> GoogleTokenInfo {
        GoogleTokenInfo {
            aud: aud.to_string(),
            sub: "1098".to_string(),
            email: email.map(str::to_string),
            name: Some("Gal".to_string()),
            picture: None,
        }
    }

    #[test]
    fn test_matching_audience_accepted() {
        let verified = validate_token_info(info("client-1", Some("g@example.com")), Some("client-1")).unwrap();
        assert_eq!(verified.email.as_deref(), Some("g@example.com"));
    }

    #[test]
    fn test_audience_mismatch_rejected() {
        let result = validate_token_info(info("other", Some("g@example.com")), Some("client-1"));
        assert!(matches!(result, Err(AppError::AuthenticationError(_))));
    }

    #[test]
    fn test_audience_not_checked_without_client_id() {
        assert!(validate_token_info(info("anything", Some("g@example.com")), None).is_ok());
    }

    #[test]
    fn test_missing_email_rejected() {
        assert!(validate_token_info(info("client-1", None), Some("client-1")).is_err());
        assert!(validate_token_info(info("client-1", Some("  ")), Some("client-1")).is_err());
    }
}
