//! 여행 공유 서비스 백엔드
//!
//! 사용자가 여행기를 올리고 좋아요, 댓글, 즐겨찾기를 남기는 서비스의 REST API와
//! WebSocket 실시간 알림을 제공합니다.
//!
//! # Features
//!
//! - **인증**: 이메일/비밀번호, Google 로그인, JWT 액세스/리프레시 토큰 회전
//! - **여행**: 페이지네이션 목록, 검색, slug 기반 상세, 소유자 전용 수정/삭제
//! - **소셜**: 좋아요 토글, 댓글, 즐겨찾기
//! - **실시간**: 변경 사항을 WebSocket 구독자에게 브로드캐스트
//! - **저장소**: MongoDB (트랜잭션 포함), Redis 사용자 캐시
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │ Routes / Socket │
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐        ┌──────────────┐
//! │    Services     │ ─────▶ │   EventHub   │ ─▶ WebSocket 세션
//! └─────────────────┘        └──────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ MongoDB + Redis │
//! └─────────────────┘
//! ```

pub mod core;
pub mod config;
pub mod db;
pub mod caching;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod realtime;
pub mod middlewares;
pub mod handlers;
pub mod routes;
pub mod utils;
