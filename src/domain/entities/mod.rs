//! MongoDB에 저장되는 도메인 엔티티
//!
//! 저장 필드명은 snake_case, ID는 `ObjectId` 입니다.
//! HTTP 응답 형태는 `dto::*::response` 에서 따로 정의합니다.

pub mod users;
pub mod trips;

pub use users::User;
pub use trips::{Comment, Like, Trip};
