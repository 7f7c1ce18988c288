//! # 실시간 알림
//!
//! 서비스 계층은 [`EventHub`] 에 [`DomainEvent`] 를 발행하고,
//! `GET /socket` 으로 연결된 각 세션이 자신에게 해당하는 이벤트를 클라이언트로 보냅니다.
//!
//! ```text
//! TripService ─┐
//! UserService ─┼─► EventHub (broadcast, 256) ─┬─► socket session ─► browser
//! socket relay ┘                              └─► socket session ─► browser
//! ```
//!
//! 허브는 `main` 에서 `ServiceLocator::set` 으로 등록합니다.

pub mod events;
pub mod hub;
pub mod session;

pub use events::{ClientMessage, DomainEvent, EventName};
pub use hub::{Envelope, EventHub};
pub use session::run_socket_session;
