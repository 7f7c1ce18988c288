//! 사용자 서비스 모듈
//!
//! 프로필, 즐겨찾기, 계정 삭제(연쇄 삭제 트랜잭션)를 담당합니다.

pub mod user_service;

pub use user_service::UserService;
