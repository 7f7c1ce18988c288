//! # Domain Layer
//!
//! ```text
//! domain/
//! ├── entities/  ← MongoDB 문서 (User, Trip, Comment, Like)
//! ├── dto/       ← HTTP 요청/응답
//! └── models/    ← 인증 사용자, JWT 클레임, Google 토큰 정보
//! ```

pub mod entities;
pub mod dto;
pub mod models;

pub use entities::*;
