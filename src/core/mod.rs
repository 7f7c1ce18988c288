//! # Core Framework Module
//!
//! 애플리케이션 전역에서 사용하는 기반 기능입니다.
//!
//! - [`registry`]: `ServiceLocator` 기반 싱글톤 의존성 주입
//! - [`errors`]: `AppError` 와 HTTP 응답 변환
//!
//! ```rust,ignore
//! use travel_share_backend::core::registry::ServiceLocator;
//!
//! ServiceLocator::set(database);
//! ServiceLocator::set(redis);
//! ServiceLocator::initialize_all().await?;
//!
//! let trip_service = TripService::instance();
//! ```

pub mod errors;
pub mod registry;

pub use errors::*;
pub use registry::*;
