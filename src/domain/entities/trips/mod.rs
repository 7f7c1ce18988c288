//! Trip 관련 엔티티 (여행, 댓글, 좋아요)

pub mod trip;
pub mod comment;
pub mod like;

pub use trip::Trip;
pub use comment::Comment;
pub use like::Like;
