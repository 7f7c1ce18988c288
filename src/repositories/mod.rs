//! # Repository Layer
//!
//! 컬렉션별 데이터 액세스 객체입니다. 모두 `instance()` 로 얻는 싱글톤이며,
//! 기동 시 `ServiceLocator::initialize_all()` 이 `init()` 을 호출해 인덱스를 만듭니다.
//!
//! | 리포지토리 | 컬렉션 | 인덱스 |
//! |------------|--------|--------|
//! | `UserRepository` | `users` | `email` unique |
//! | `TripRepository` | `trips` | `slug` unique, `owner_id`, `created_at` |
//! | `CommentRepository` | `comments` | `trip_id`, `owner_id` |
//! | `LikeRepository` | `likes` | `(trip_id, owner)` unique, `owner` |
//!
//! `*_in` 으로 끝나는 메서드는 호출자가 연 트랜잭션 세션 안에서 실행됩니다.

use mongodb::bson::oid::ObjectId;
use mongodb::error::{ErrorKind, WriteFailure};

use crate::core::errors::{AppError, AppResult};

pub mod users;
pub mod trips;

pub const USERS_COLLECTION: &str = "users";
pub const TRIPS_COLLECTION: &str = "trips";
pub const COMMENTS_COLLECTION: &str = "comments";
pub const LIKES_COLLECTION: &str = "likes";

/// 경로 파라미터 등 외부 입력 ID 파싱. 실패하면 400 입니다.
pub fn parse_object_id(id: &str, label: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(id.trim())
        .map_err(|_| AppError::ValidationError(format!("Invalid {} id: {}", label, id)))
}

/// unique index 위반 (E11000)
pub(crate) fn is_duplicate_key_error(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == 11000
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_id() {
        let id = ObjectId::new();
        assert_eq!(parse_object_id(&id.to_hex(), "trip").unwrap(), id);
        assert_eq!(parse_object_id(&format!(" {} ", id.to_hex()), "trip").unwrap(), id);
    }

    #[test]
    fn test_parse_object_id_rejects_garbage() {
        match parse_object_id("not-an-id", "trip") {
            Err(AppError::ValidationError(msg)) => assert!(msg.contains("trip")),
            other => panic!("expected ValidationError, got {:?}", other),
        }
    }
}
