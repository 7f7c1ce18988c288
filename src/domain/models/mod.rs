//! # Domain Models Module
//!
//! 저장되지 않는 도메인 값 객체입니다.
//!
//! ```text
//! models/
//! ├── auth/    ← 요청 사용자 추출기, 인증 모드
//! ├── token/   ← JWT 클레임, 토큰 쌍
//! └── google/  ← Google ID 토큰 정보
//! ```
//!
//! 영속 객체는 `entities`, HTTP 입출력 형태는 `dto` 에 있습니다.

pub mod auth;
pub mod token;
pub mod google;
