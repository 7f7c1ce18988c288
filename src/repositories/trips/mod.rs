//! 여행, 댓글, 좋아요 리포지토리

pub mod trip_query;
pub mod trip_repo;
pub mod comment_repo;
pub mod like_repo;

pub use trip_repo::TripRepository;
pub use comment_repo::CommentRepository;
pub use like_repo::LikeRepository;
