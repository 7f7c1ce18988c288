//! 여행 서비스 모듈

pub mod trip_service;

pub use trip_service::TripService;
