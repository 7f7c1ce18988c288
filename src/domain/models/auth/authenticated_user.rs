//! 인증된 사용자 추출기
//!
//! `AuthMiddleware` 가 검증한 사용자 정보를 request extensions 에 넣으면,
//! 핸들러는 `AuthenticatedUser` 또는 `OptionalUser` 인자로 꺼내 씁니다.
//!
//! ```rust,ignore
//! #[post("")]
//! async fn add_trip(user: AuthenticatedUser, payload: web::Json<CreateTripRequest>) -> ... {
//!     TripService::instance().add_trip(&user, payload.into_inner()).await
//! }
//! ```

use std::future::{ready, Ready};

use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::core::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// 사용자 ID (hex)
    pub user_id: String,
}

impl AuthenticatedUser {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    pub fn object_id(&self) -> Result<ObjectId, AppError> {
        ObjectId::parse_str(&self.user_id)
            .map_err(|_| AppError::AuthenticationError("Invalid user id in token".to_string()))
    }

    pub fn is(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(AppError::AuthenticationError(
                "Access denied: no valid token".to_string(),
            )
            .into())),
        }
    }
}

/// 비로그인 요청도 허용하는 라우트용
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<AuthenticatedUser>);

impl OptionalUser {
    pub fn user_id(&self) -> Option<&str> {
        self.0.as_ref().map(|user| user.user_id.as_str())
    }
}

impl FromRequest for OptionalUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        ready(Ok(OptionalUser(user)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_extracts_user_from_extensions() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(AuthenticatedUser::new("64b000000000000000000001"));

        let user = AuthenticatedUser::extract(&req).await.unwrap();
        assert!(user.is("64b000000000000000000001"));
        assert!(user.object_id().is_ok());
    }

    #[actix_web::test]
    async fn test_missing_user_is_unauthorized() {
        let req = TestRequest::default().to_http_request();
        let err = AuthenticatedUser::extract(&req).await.unwrap_err();

        assert_eq!(
            err.as_response_error().status_code(),
            actix_web::http::StatusCode::UNAUTHORIZED
        );
    }

    #[actix_web::test]
    async fn test_optional_user_without_token() {
        let req = TestRequest::default().to_http_request();
        let user = OptionalUser::extract(&req).await.unwrap();
        assert!(user.user_id().is_none());
    }
}
