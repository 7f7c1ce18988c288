//! 여행/댓글/좋아요 DTO

pub mod request;
pub mod response;
