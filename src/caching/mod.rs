//! # Caching Module
//!
//! Redis 기반 캐시 클라이언트와 캐시 키 규칙입니다.
//!
//! | 키 | 값 | TTL |
//! |----|----|-----|
//! | `user:{id}` | `User` JSON | `USER_CACHE_TTL_SECONDS` (기본 600초) |

pub mod redis;

/// 사용자 캐시 키
pub fn user_cache_key(user_id: &str) -> String {
    format!("user:{}", user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_cache_key() {
        assert_eq!(user_cache_key("64b0c0ffee"), "user:64b0c0ffee");
    }
}
