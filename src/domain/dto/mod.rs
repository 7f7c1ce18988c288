//! # Data Transfer Objects (DTO) Module
//!
//! HTTP 요청/응답 본문 형태입니다. 클라이언트 계약에 맞춰 camelCase 필드와
//! `_id` 식별자를 사용합니다.
//!
//! | Spring | 이 모듈 |
//! |--------|---------|
//! | `@RequestBody` + `@Valid` | `request` 구조체 + `validator::Validate` |
//! | `@ResponseBody` | `response` 구조체 + `serde::Serialize` |
//!
//! 요청 DTO 는 핸들러에서 `payload.validate()?` 로 검증한 뒤 서비스로 넘깁니다.

pub mod users;
pub mod trips;
