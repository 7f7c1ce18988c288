//! # WebSocket 세션
//!
//! 연결 하나당 하나의 루프가 세 가지를 동시에 기다립니다.
//!
//! - heartbeat: 5초마다 ping, 10초 동안 아무 프레임도 없으면 종료
//! - 클라이언트 프레임: relay 대상 이벤트면 허브로 다시 발행
//! - 허브 이벤트: 이 세션 대상이면 JSON 텍스트로 전송

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use log::{debug, info, warn};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;
use tokio::time;

use crate::realtime::events::{ClientMessage, EventName};
use crate::realtime::hub::{Envelope, EventHub};

#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(100);

/// 업그레이드된 연결을 끝날 때까지 처리합니다.
pub async fn run_socket_session(
    hub: Arc<EventHub>,
    user_id: Option<String>,
    session: Session,
    stream: MessageStream,
) {
    let receiver = hub.subscribe();
    info!("🔌 소켓 연결: {}", user_id.as_deref().unwrap_or("anonymous"));

    SocketSession { hub, user_id }.run(session, stream, receiver).await;
}

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    HeartbeatTimeout,
    Protocol(ProtocolError),
    InvalidPayload,
    Network(Closed),
    HubClosed,
    Disconnected,
}

struct SocketSession {
    hub: Arc<EventHub>,
    user_id: Option<String>,
}

impl SocketSession {
    async fn run(&self, mut session: Session, mut stream: MessageStream, mut receiver: Receiver<Arc<Envelope>>) {
        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);

        loop {
            let result = tokio::select! {
                _ = heartbeat.tick() => {
                    self.handle_heartbeat_tick(&mut session, &last_heartbeat).await
                }
                message = stream.recv() => {
                    self.handle_stream_message(&mut session, &mut last_heartbeat, message).await
                }
                envelope = receiver.recv() => {
                    self.handle_hub_event(&mut session, envelope).await
                }
            };

            if let Err(error) = result {
                self.log_shutdown_reason(&error);
                if let Some(reason) = close_reason_for(error) {
                    if let Err(e) = session.close(reason).await {
                        debug!("소켓 종료 프레임 전송 실패: {}", e);
                    }
                }
                return;
            }
        }
    }

    async fn handle_heartbeat_tick(&self, session: &mut Session, last_heartbeat: &Instant) -> Result<(), SessionError> {
        if Instant::now().duration_since(*last_heartbeat) > CLIENT_TIMEOUT {
            return Err(SessionError::HeartbeatTimeout);
        }

        session.ping(b"").await.map_err(SessionError::Network)
    }

    async fn handle_stream_message(
        &self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Option<Result<Message, ProtocolError>>,
    ) -> Result<(), SessionError> {
        let Some(message) = message else {
            return Err(SessionError::StreamClosed);
        };

        match message.map_err(SessionError::Protocol)? {
            Message::Ping(payload) => {
                *last_heartbeat = Instant::now();
                session.pong(&payload).await.map_err(SessionError::Network)
            }
            Message::Text(text) => {
                *last_heartbeat = Instant::now();
                self.relay_client_message(text.as_ref())
            }
            Message::Pong(_) | Message::Binary(_) | Message::Continuation(_) | Message::Nop => {
                *last_heartbeat = Instant::now();
                Ok(())
            }
            Message::Close(reason) => Err(SessionError::ClientClosed(reason)),
        }
    }

    fn relay_client_message(&self, text: &str) -> Result<(), SessionError> {
        let message = serde_json::from_str::<ClientMessage>(text).map_err(|e| {
            warn!("⚠️ 잘못된 소켓 메시지: {}", e);
            SessionError::InvalidPayload
        })?;

        let name = message.event.clone();
        match message.into_relay() {
            Some(event) => {
                self.hub.publish(event);
            }
            None => debug!("relay 대상이 아닌 소켓 이벤트 무시: {}", name),
        }

        Ok(())
    }

    async fn handle_hub_event(
        &self,
        session: &mut Session,
        envelope: Result<Arc<Envelope>, RecvError>,
    ) -> Result<(), SessionError> {
        let envelope = match envelope {
            Ok(envelope) => envelope,
            Err(RecvError::Lagged(skipped)) => {
                warn!("⚠️ 소켓 수신 지연으로 이벤트 {}개 건너뜀", skipped);
                return Ok(());
            }
            Err(RecvError::Closed) => return Err(SessionError::HubClosed),
        };

        if !envelope.is_for(self.user_id.as_deref()) {
            return Ok(());
        }

        match envelope.event.to_frame() {
            Ok(frame) => session.text(frame).await.map_err(SessionError::Network)?,
            Err(e) => warn!("⚠️ 이벤트 직렬화 실패: {}", e),
        }

        if envelope.event.event == EventName::DisconnectUser && envelope.target.is_some() {
            return Err(SessionError::Disconnected);
        }

        Ok(())
    }

    fn log_shutdown_reason(&self, error: &SessionError) {
        let who = self.user_id.as_deref().unwrap_or("anonymous");
        match error {
            SessionError::HeartbeatTimeout => warn!("⚠️ 소켓 heartbeat 시간 초과: {}", who),
            SessionError::Protocol(e) => warn!("⚠️ 소켓 프로토콜 오류 ({}): {}", who, e),
            SessionError::Network(e) => warn!("⚠️ 소켓 전송 실패 ({}): {}", who, e),
            SessionError::HubClosed => warn!("⚠️ 이벤트 허브가 닫혀 소켓 종료: {}", who),
            SessionError::Disconnected => info!("🔌 계정 삭제로 소켓 종료: {}", who),
            SessionError::InvalidPayload | SessionError::ClientClosed(_) | SessionError::StreamClosed => {
                info!("🔌 소켓 연결 해제: {}", who)
            }
        }
    }
}

fn close_reason_for(error: SessionError) -> Option<Option<CloseReason>> {
    let reason = |code: CloseCode, description: &str| {
        Some(Some(CloseReason {
            code,
            description: Some(description.to_string()),
        }))
    };

    match error {
        SessionError::HeartbeatTimeout => reason(CloseCode::Normal, "heartbeat timeout"),
        SessionError::Protocol(_) => reason(CloseCode::Protocol, "protocol error"),
        SessionError::InvalidPayload => reason(CloseCode::Policy, "invalid payload"),
        SessionError::Disconnected => reason(CloseCode::Normal, "user deleted"),
        SessionError::HubClosed => reason(CloseCode::Away, "server shutting down"),
        SessionError::ClientClosed(reason) => Some(reason),
        SessionError::StreamClosed | SessionError::Network(_) => None,
    }
}
