//! WebSocket 진입점 (`GET /socket`)
//!
//! `?token=<access token>` 이 있으면 해당 사용자의 방에 들어가 사용자 대상 이벤트도 받습니다.
//! 토큰이 없으면 브로드캐스트만 받는 익명 연결입니다.

use actix_web::{get, rt, web, HttpRequest, HttpResponse};
use log::error;
use serde::Deserialize;

use crate::core::errors::AppError;
use crate::core::registry::ServiceLocator;
use crate::realtime::{run_socket_session, EventHub};
use crate::services::auth::TokenService;

#[derive(Debug, Deserialize)]
pub struct SocketQuery {
    pub token: Option<String>,
}

#[get("/socket")]
pub async fn socket_entry(
    req: HttpRequest,
    body: web::Payload,
    query: web::Query<SocketQuery>,
) -> Result<HttpResponse, actix_web::Error> {
    let user_id = match query.token.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        Some(token) => Some(TokenService::instance().verify_access_token(token)?.user_id),
        None => None,
    };

    let hub = ServiceLocator::try_get::<EventHub>()
        .ok_or_else(|| AppError::InternalError("Event hub is not initialized".to_string()))?;

    let (response, session, stream) = actix_ws::handle(&req, body).map_err(|e| {
        error!("❌ WebSocket 업그레이드 실패: {}", e);
        e
    })?;

    rt::spawn(run_socket_session(hub, user_id, session, stream));

    Ok(response)
}
