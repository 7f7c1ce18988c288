//! 사용자/인증 DTO

pub mod request;
pub mod response;
