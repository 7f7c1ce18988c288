//! # 인증 미들웨어
//!
//! `Authorization: Bearer <access token>` 을 검증해 [`AuthenticatedUser`] 를
//! request extensions 에 넣습니다.
//!
//! | 모드 | 토큰 없음/잘못됨 | 토큰 유효 |
//! |------|------------------|-----------|
//! | `required()` | 401 JSON | 사용자 주입 후 진행 |
//! | `optional()` | 익명으로 진행 | 사용자 주입 후 진행 |
//!
//! ```rust,ignore
//! web::scope("/users")
//!     .wrap(AuthMiddleware::required())
//!     .service(get_user)
//! ```
//!
//! [`AuthenticatedUser`]: crate::domain::models::auth::AuthenticatedUser

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, Result,
};

use crate::domain::models::auth::AuthMode;
use crate::middlewares::auth_inner::AuthMiddlewareService;

pub struct AuthMiddleware {
    mode: AuthMode,
}

impl AuthMiddleware {
    pub fn new(mode: AuthMode) -> Self {
        Self { mode }
    }

    pub fn required() -> Self {
        Self::new(AuthMode::Required)
    }

    pub fn optional() -> Self {
        Self::new(AuthMode::Optional)
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            mode: self.mode,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App, HttpResponse};

    use crate::domain::models::auth::{AuthenticatedUser, OptionalUser};
    use crate::services::auth::TokenService;

    async fn whoami(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(user.user_id)
    }

    async fn maybe_whoami(user: OptionalUser) -> HttpResponse {
        HttpResponse::Ok().body(user.user_id().unwrap_or("anonymous").to_string())
    }

    #[actix_web::test]
    async fn test_required_without_token_is_unauthorized() {
        let app = test::init_service(
            App::new().service(
                web::scope("/private")
                    .wrap(AuthMiddleware::required())
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::get().uri("/private").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn test_required_with_garbage_token_is_unauthorized() {
        let app = test::init_service(
            App::new().service(
                web::scope("/private")
                    .wrap(AuthMiddleware::required())
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/private")
            .insert_header(("Authorization", "Bearer not.a.jwt"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_required_with_valid_token_injects_user() {
        let app = test::init_service(
            App::new().service(
                web::scope("/private")
                    .wrap(AuthMiddleware::required())
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;

        let token = TokenService::instance()
            .generate_access_token("64b000000000000000000001")
            .unwrap();
        let req = test::TestRequest::get()
            .uri("/private")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body = test::read_body(res).await;
        assert_eq!(body, "64b000000000000000000001");
    }

    #[actix_web::test]
    async fn test_optional_without_token_is_anonymous() {
        let app = test::init_service(
            App::new().service(
                web::scope("/public")
                    .wrap(AuthMiddleware::optional())
                    .route("", web::get().to(maybe_whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/public")
            .insert_header(("Authorization", "Bearer broken"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, "anonymous");
    }
}
