//! 인증 핸들러 (`/auth`)
//!
//! 로그아웃과 토큰 갱신은 `Authorization: Bearer <refresh token>` 헤더로 리프레시 토큰을 받습니다.

use actix_web::{post, web, HttpRequest, HttpResponse};

use crate::core::errors::AppError;
use crate::domain::dto::users::request::{GoogleSignInRequest, LoginRequest, RegisterRequest};
use crate::domain::dto::users::response::MessageResponse;
use crate::services::auth::{AuthService, TokenService};

#[post("/register")]
pub async fn register(payload: web::Json<RegisterRequest>) -> Result<HttpResponse, AppError> {
    let response = AuthService::instance().register(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

#[post("/login")]
pub async fn login(payload: web::Json<LoginRequest>) -> Result<HttpResponse, AppError> {
    let response = AuthService::instance().login(payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/google")]
pub async fn google_sign_in(payload: web::Json<GoogleSignInRequest>) -> Result<HttpResponse, AppError> {
    let response = AuthService::instance().google_sign_in(payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/logout")]
pub async fn logout(req: HttpRequest) -> Result<HttpResponse, AppError> {
    let refresh_token = bearer_token(&req)?;
    AuthService::instance().logout(&refresh_token).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Logged out successfully")))
}

#[post("/refresh")]
pub async fn refresh(req: HttpRequest) -> Result<HttpResponse, AppError> {
    let refresh_token = bearer_token(&req)?;
    let tokens = AuthService::instance().refresh(&refresh_token).await?;

    Ok(HttpResponse::Ok().json(tokens))
}

/// 헤더가 없거나 형식이 틀리면 401.
fn bearer_token(req: &HttpRequest) -> Result<String, AppError> {
    let header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::AuthenticationError("Missing refresh token".to_string()))?;

    TokenService::instance()
        .extract_bearer_token(header)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_refresh_without_header_is_unauthorized() {
        let app = test::init_service(App::new().service(web::scope("/auth").service(refresh).service(logout))).await;

        for uri in ["/auth/refresh", "/auth/logout"] {
            let req = test::TestRequest::post().uri(uri).to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[actix_web::test]
    async fn test_bearer_token_extraction() {
        let req = test::TestRequest::default()
            .insert_header(("Authorization", "Bearer refresh.jwt.value"))
            .to_http_request();
        assert_eq!(bearer_token(&req).unwrap(), "refresh.jwt.value");

        let req = test::TestRequest::default()
            .insert_header(("Authorization", "Token abc"))
            .to_http_request();
        assert!(matches!(bearer_token(&req), Err(AppError::AuthenticationError(_))));
    }
}
