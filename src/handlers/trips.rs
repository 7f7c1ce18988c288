//! 여행 핸들러 (`/trips`)
//!
//! 스코프 전체에 선택 인증이 걸려 있고, 변경 요청은 `AuthenticatedUser` 추출기로 401 을 냅니다.
//! 검색엔진/SNS 봇이 목록이나 단건을 요청하면 OG 태그가 들어간 HTML 을 돌려줍니다.

use std::collections::HashMap;

use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};

use crate::core::errors::AppError;
use crate::domain::dto::trips::request::{AddCommentRequest, CreateTripRequest, PaginationQuery, UpdateTripRequest};
use crate::domain::dto::users::response::MessageResponse;
use crate::domain::models::auth::{AuthenticatedUser, OptionalUser};
use crate::services::trips::TripService;
use crate::utils::bot_detection::is_bot_request;
use crate::utils::render_html::{render_single_trip_as_html, render_trips_as_html};

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

#[get("")]
pub async fn get_all_trips(
    req: HttpRequest,
    query: web::Query<PaginationQuery>,
    viewer: OptionalUser,
) -> Result<HttpResponse, AppError> {
    let service = TripService::instance();

    if is_bot_request(&req) {
        let trips = service.get_trip_page_entities(query.page, query.limit).await?;
        return Ok(HttpResponse::Ok()
            .content_type(HTML_CONTENT_TYPE)
            .body(render_trips_as_html(&trips)?));
    }

    let response = service
        .get_all_trips(query.page, query.limit, viewer.user_id())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/owner/{id}")]
pub async fn get_trips_by_owner(
    path: web::Path<String>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let trips = TripService::instance()
        .get_trips_by_owner(&path.into_inner(), Some(&user.user_id))
        .await?;
    Ok(HttpResponse::Ok().json(trips))
}

#[get("/favorites/{userId}")]
pub async fn get_favorite_trips(
    path: web::Path<String>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let trips = TripService::instance()
        .get_favorite_trips(&path.into_inner(), Some(&user.user_id))
        .await?;
    Ok(HttpResponse::Ok().json(trips))
}

#[get("/FullTrip/{id}")]
pub async fn get_full_trip(
    req: HttpRequest,
    path: web::Path<String>,
    viewer: OptionalUser,
) -> Result<HttpResponse, AppError> {
    let service = TripService::instance();
    let id_or_slug = path.into_inner();

    if is_bot_request(&req) {
        let trip = service.find_trip(&id_or_slug).await?;
        return Ok(HttpResponse::Ok()
            .content_type(HTML_CONTENT_TYPE)
            .body(render_single_trip_as_html(&trip)?));
    }

    let response = service.get_full_trip(&id_or_slug, viewer.user_id()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// 결과가 없으면 404 와 함께 `{"data": []}`.
#[get("/search/parameters")]
pub async fn search_trips(
    query: web::Query<HashMap<String, String>>,
    viewer: OptionalUser,
) -> Result<HttpResponse, AppError> {
    let response = TripService::instance()
        .search_trips(&query, viewer.user_id())
        .await?;

    if response.data.is_empty() {
        Ok(HttpResponse::NotFound().json(response))
    } else {
        Ok(HttpResponse::Ok().json(response))
    }
}

#[get("/{tripId}/likes/details")]
pub async fn get_likes_with_user_details(
    path: web::Path<String>,
    _user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let likes = TripService::instance()
        .get_likes_with_user_details(&path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(likes))
}

#[post("")]
pub async fn add_trip(
    user: AuthenticatedUser,
    payload: web::Json<CreateTripRequest>,
) -> Result<HttpResponse, AppError> {
    let response = TripService::instance()
        .add_trip(&user, payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(response))
}

#[post("/{tripId}/comments")]
pub async fn add_comment(
    path: web::Path<String>,
    user: AuthenticatedUser,
    payload: web::Json<AddCommentRequest>,
) -> Result<HttpResponse, AppError> {
    let comments = TripService::instance()
        .add_comment(&path.into_inner(), &user, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(comments))
}

#[post("/{tripId}/likes")]
pub async fn toggle_like(path: web::Path<String>, user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let response = TripService::instance()
        .toggle_like(&path.into_inner(), &user)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[put("/{id}")]
pub async fn update_trip(
    path: web::Path<String>,
    user: AuthenticatedUser,
    payload: web::Json<UpdateTripRequest>,
) -> Result<HttpResponse, AppError> {
    let response = TripService::instance()
        .update_trip(&path.into_inner(), &user, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[delete("/{id}")]
pub async fn delete_trip(path: web::Path<String>, user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    TripService::instance()
        .delete_trip(&path.into_inner(), &user)
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Trip deleted successfully")))
}

#[delete("/{tripId}/{commentId}")]
pub async fn delete_comment(
    path: web::Path<(String, String)>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let (trip_id, comment_id) = path.into_inner();
    let comments = TripService::instance()
        .delete_comment(&trip_id, &comment_id, &user)
        .await?;
    Ok(HttpResponse::Ok().json(comments))
}
