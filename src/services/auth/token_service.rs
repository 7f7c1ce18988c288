//! JWT 토큰 관리 서비스
//!
//! 액세스 토큰과 리프레시 토큰의 발급과 검증을 담당합니다.
//!
//! | 종류 | 서명 키 | 만료 | 용도 |
//! |------|---------|------|------|
//! | 액세스 | `JWT_SECRET` | `JWT_EXPIRATION_SECONDS` (기본 1시간) | `Authorization: Bearer` 요청 인증 |
//! | 리프레시 | `JWT_REFRESH_SECRET` | `JWT_REFRESH_EXPIRATION_DAYS` (기본 7일) | `/auth/refresh`, `/auth/logout` |
//!
//! 리프레시 토큰은 원문 대신 SHA-256 해시(`hash_token`)로 사용자 문서에 보관합니다.

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::OnceCell;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::core::errors::{AppError, ErrorContext};
use crate::core::registry::{Service, ServiceRegistration};
use crate::domain::models::token::{TokenClaims, TokenKind, TokenPair};

static TOKEN_SERVICE_INSTANCE: OnceCell<Arc<TokenService>> = OnceCell::new();

pub struct TokenService {
    access_secret: String,
    refresh_secret: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn instance() -> Arc<Self> {
        TOKEN_SERVICE_INSTANCE
            .get_or_init(|| Arc::new(Self::from_config()))
            .clone()
    }

    fn from_config() -> Self {
        Self::with_secrets(
            JwtConfig::secret(),
            JwtConfig::refresh_secret(),
            Duration::seconds(JwtConfig::access_expiration_seconds()),
            Duration::days(JwtConfig::refresh_expiration_days()),
        )
    }

    pub fn with_secrets(
        access_secret: String,
        refresh_secret: String,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            access_secret,
            refresh_secret,
            access_ttl,
            refresh_ttl,
        }
    }

    fn secret_for(&self, kind: TokenKind) -> &str {
        match kind {
            TokenKind::Access => &self.access_secret,
            TokenKind::Refresh => &self.refresh_secret,
        }
    }

    fn generate(&self, user_id: &str, kind: TokenKind) -> Result<String, AppError> {
        let now = Utc::now();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };

        let claims = TokenClaims {
            user_id: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let encoding_key = EncodingKey::from_secret(self.secret_for(kind).as_bytes());

        encode(&Header::default(), &claims, &encoding_key)
            .with_context(|| format!("Failed to sign {:?} token", kind))
    }

    pub fn generate_access_token(&self, user_id: &str) -> Result<String, AppError> {
        self.generate(user_id, TokenKind::Access)
    }

    pub fn generate_refresh_token(&self, user_id: &str) -> Result<String, AppError> {
        self.generate(user_id, TokenKind::Refresh)
    }

    pub fn generate_token_pair(&self, user_id: &str) -> Result<TokenPair, AppError> {
        Ok(TokenPair {
            access_token: self.generate_access_token(user_id)?,
            refresh_token: self.generate_refresh_token(user_id)?,
        })
    }

    fn verify(&self, token: &str, kind: TokenKind) -> Result<TokenClaims, AppError> {
        let decoding_key = DecodingKey::from_secret(self.secret_for(kind).as_bytes());

        decode::<TokenClaims>(token, &decoding_key, &Validation::default())
            .map(|token_data| token_data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::AuthenticationError("Token expired".to_string()),
                _ => AppError::AuthenticationError("Invalid token".to_string()),
            })
    }

    pub fn verify_access_token(&self, token: &str) -> Result<TokenClaims, AppError> {
        self.verify(token, TokenKind::Access)
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<TokenClaims, AppError> {
        self.verify(token, TokenKind::Refresh)
    }

    /// `Authorization` 헤더 값에서 토큰 부분만 꺼냅니다.
    pub fn extract_bearer_token<'a>(&self, auth_header: &'a str) -> Result<&'a str, AppError> {
        match auth_header.trim().strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => Ok(token.trim()),
            _ => Err(AppError::AuthenticationError(
                "Invalid authorization header".to_string(),
            )),
        }
    }

    /// 저장용 리프레시 토큰 해시 (hex)
    pub fn hash_token(token: &str) -> String {
        format!("{:x}", Sha256::digest(token.as_bytes()))
    }
}

impl Service for TokenService {
    fn name(&self) -> &str {
        "token_service"
    }
}

fn token_service_constructor() -> Arc<dyn Service> {
    TokenService::instance()
}

inventory::submit! {
    ServiceRegistration {
        name: "token_service",
        constructor: token_service_constructor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::with_secrets(
            "access-secret".to_string(),
            "refresh-secret".to_string(),
            Duration::hours(1),
            Duration::days(7),
        )
    }

    #[test]
    fn test_access_token_roundtrip() {
        let service = service();
        let token = service.generate_access_token("64b000000000000000000001").unwrap();
        let claims = service.verify_access_token(&token).unwrap();

        assert_eq!(claims.user_id, "64b000000000000000000001");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_kinds_are_not_interchangeable() {
        let service = service();
        let pair = service.generate_token_pair("u1").unwrap();

        assert!(service.verify_refresh_token(&pair.refresh_token).is_ok());
        assert!(matches!(
            service.verify_refresh_token(&pair.access_token),
            Err(AppError::AuthenticationError(_))
        ));
        assert!(matches!(
            service.verify_access_token(&pair.refresh_token),
            Err(AppError::AuthenticationError(_))
        ));
    }

    #[test]
    fn test_tokens_issued_together_differ() {
        let service = service();
        let first = service.generate_refresh_token("u1").unwrap();
        let second = service.generate_refresh_token("u1").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = TokenService::with_secrets(
            "access-secret".to_string(),
            "refresh-secret".to_string(),
            Duration::seconds(-3600),
            Duration::days(7),
        );
        let token = service.generate_access_token("u1").unwrap();

        match service.verify_access_token(&token) {
            Err(AppError::AuthenticationError(msg)) => assert_eq!(msg, "Token expired"),
            other => panic!("expected expiry error, got {:?}", other),
        }
    }

    #[test]
    fn test_garbage_token_is_authentication_error() {
        assert!(matches!(
            service().verify_access_token("not.a.jwt"),
            Err(AppError::AuthenticationError(_))
        ));
    }

    #[test]
    fn test_extract_bearer_token() {
        let service = service();
        assert_eq!(service.extract_bearer_token("Bearer abc.def").unwrap(), "abc.def");
        assert!(service.extract_bearer_token("Basic abc").is_err());
        assert!(service.extract_bearer_token("Bearer   ").is_err());
    }

    #[test]
    fn test_hash_token_is_stable_hex() {
        let hash = TokenService::hash_token("refresh");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, TokenService::hash_token("refresh"));
        assert_ne!(hash, TokenService::hash_token("other"));
    }
}
