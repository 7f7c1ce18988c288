//! HTTP 미들웨어
//!
//! - [`AuthMiddleware`]: Bearer 액세스 토큰 검증 (필수/선택)

pub mod auth_middleware;
mod auth_inner;

pub use auth_middleware::AuthMiddleware;
