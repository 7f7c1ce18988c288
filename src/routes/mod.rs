//! 라우트 구성
//!
//! ```text
//! GET  /health
//! /auth    공개
//! /users   인증 필수
//! /trips   선택 인증 (변경 요청은 핸들러에서 인증 확인)
//! GET  /socket
//! ```

use actix_web::{get, web, HttpResponse};
use serde_json::json;

use crate::core::registry::ServiceLocator;
use crate::handlers;
use crate::middlewares::AuthMiddleware;
use crate::realtime::EventHub;

pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check);
    cfg.service(handlers::socket::socket_entry);

    configure_auth_routes(cfg);
    configure_user_routes(cfg);
    configure_trip_routes(cfg);
}

fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(handlers::auth::register)
            .service(handlers::auth::login)
            .service(handlers::auth::google_sign_in)
            .service(handlers::auth::logout)
            .service(handlers::auth::refresh),
    );
}

fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .wrap(AuthMiddleware::required())
            .service(handlers::users::add_favorite_trip)
            .service(handlers::users::remove_favorite_trip)
            .service(handlers::users::get_favorite_trip_ids)
            .service(handlers::users::verify_password)
            .service(handlers::users::get_user)
            .service(handlers::users::update_user)
            .service(handlers::users::delete_user),
    );
}

fn configure_trip_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/trips")
            .wrap(AuthMiddleware::optional())
            .service(handlers::trips::get_all_trips)
            .service(handlers::trips::add_trip)
            .service(handlers::trips::get_trips_by_owner)
            .service(handlers::trips::get_favorite_trips)
            .service(handlers::trips::get_full_trip)
            .service(handlers::trips::search_trips)
            .service(handlers::trips::get_likes_with_user_details)
            .service(handlers::trips::add_comment)
            .service(handlers::trips::toggle_like)
            .service(handlers::trips::update_trip)
            .service(handlers::trips::delete_trip)
            .service(handlers::trips::delete_comment),
    );
}

#[get("/health")]
async fn health_check() -> HttpResponse {
    let socket_subscribers = ServiceLocator::try_get::<EventHub>()
        .map(|hub| hub.subscriber_count())
        .unwrap_or_default();

    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "travel_share_backend",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "features": {
            "database": "MongoDB",
            "cache": "Redis",
            "realtime": "WebSocket"
        },
        "socketSubscribers": socket_subscribers
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_health_check() {
        let app = test::init_service(App::new().service(health_check)).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "travel_share_backend");
    }

    #[actix_web::test]
    async fn test_user_routes_require_token() {
        let app = test::init_service(App::new().configure(configure_user_routes)).await;

        let req = test::TestRequest::get()
            .uri("/users/64b000000000000000000001")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_trip_mutation_without_token_is_unauthorized() {
        let app = test::init_service(App::new().configure(configure_trip_routes)).await;

        let req = test::TestRequest::post()
            .uri("/trips/64b000000000000000000001/likes")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
