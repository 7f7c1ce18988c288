//! 인증 서비스 모듈
//!
//! - [`TokenService`]: HMAC-SHA256 액세스/리프레시 JWT 발급과 검증
//! - [`GoogleAuthService`]: Google ID 토큰 검증
//! - [`AuthService`]: 회원가입, 로그인, 로그아웃, 토큰 회전
//!
//! ```rust,ignore
//! use crate::services::auth::AuthService;
//!
//! let response = AuthService::instance().login(request).await?;
//! ```

pub mod token_service;
pub mod google_auth_service;
pub mod auth_service;

pub use token_service::*;
pub use google_auth_service::*;
pub use auth_service::AuthService;
