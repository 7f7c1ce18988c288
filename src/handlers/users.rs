//! 사용자 핸들러 (`/users`, 인증 필수)

use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::core::errors::AppError;
use crate::domain::dto::users::request::{UpdateUserRequest, VerifyPasswordRequest};
use crate::domain::dto::users::response::MessageResponse;
use crate::domain::models::auth::AuthenticatedUser;
use crate::services::users::UserService;

#[get("/{id}")]
pub async fn get_user(path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let response = UserService::instance().get_user(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/{userId}/favorites")]
pub async fn get_favorite_trip_ids(path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let ids = UserService::instance()
        .get_favorite_trip_ids(&path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ids))
}

#[put("/{id}")]
pub async fn update_user(
    path: web::Path<String>,
    user: AuthenticatedUser,
    payload: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, AppError> {
    let response = UserService::instance()
        .update_user(&path.into_inner(), &user, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[delete("/{id}")]
pub async fn delete_user(path: web::Path<String>, user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    UserService::instance().delete_user(&path.into_inner(), &user).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("User deleted successfully")))
}

#[post("/{id}/verify-password")]
pub async fn verify_password(
    path: web::Path<String>,
    user: AuthenticatedUser,
    payload: web::Json<VerifyPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    let response = UserService::instance()
        .verify_password(&path.into_inner(), &user, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/favorites/{tripId}")]
pub async fn add_favorite_trip(path: web::Path<String>, user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let response = UserService::instance()
        .add_favorite_trip(&user, &path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[delete("/favorites/{tripId}")]
pub async fn remove_favorite_trip(
    path: web::Path<String>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let response = UserService::instance()
        .remove_favorite_trip(&user, &path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}
