pub mod trip_response;
pub mod like_response;

pub use trip_response::*;
pub use like_response::*;
