//! # HTTP 핸들러
//!
//! 요청 DTO 를 받아 서비스에 넘기고 결과를 JSON 으로 돌려줍니다.
//! 에러는 `AppError` 를 그대로 반환하면 상태 코드와 `{"error": "..."}` 본문으로 바뀝니다.
//!
//! ```text
//! Client
//!   │  HTTP / WebSocket
//!   ▼
//! handlers (이 모듈)   ← 요청 파싱, 상태 코드
//!   ▼
//! services             ← 비즈니스 로직, 이벤트 발행
//!   ▼
//! repositories         ← MongoDB / Redis
//! ```
//!
//! | 모듈 | 경로 |
//! |------|------|
//! | [`auth`] | `/auth/*` |
//! | [`users`] | `/users/*` |
//! | [`trips`] | `/trips/*` |
//! | [`socket`] | `/socket` |

pub mod auth;
pub mod users;
pub mod trips;
pub mod socket;
