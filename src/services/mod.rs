//! 비즈니스 로직 계층
//!
//! 각 서비스는 `OnceCell` 싱글톤이며 `inventory` 로 등록되어
//! `ServiceLocator::initialize_all()` 에서 함께 초기화됩니다.
//!
//! - [`auth`]: 토큰, 로그인, Google 로그인
//! - [`users`]: 프로필, 즐겨찾기, 계정 삭제
//! - [`trips`]: 여행, 댓글, 좋아요
//!
//! ```rust,ignore
//! use crate::services::trips::TripService;
//!
//! let trips = TripService::instance().get_all_trips(Some(1), Some(10), None).await?;
//! ```

pub mod auth;
pub mod users;
pub mod trips;
