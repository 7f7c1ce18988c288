pub mod trip_request;
pub mod comment_request;

pub use trip_request::*;
pub use comment_request::*;
