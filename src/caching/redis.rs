//! # Redis 캐시 클라이언트
//!
//! JSON 직렬화 기반의 단순 get/set 캐시입니다.
//! `ConnectionManager` 하나를 복제해 쓰므로 요청마다 새 TCP 연결을 만들지 않고,
//! 연결이 끊기면 자동으로 재연결됩니다.
//!
//! 캐시는 보조 저장소입니다. 호출자는 캐시 오류를 로그로 남기고
//! MongoDB 결과를 그대로 사용해야 합니다.

use std::env;

use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use serde::{de::DeserializeOwned, Serialize};

use crate::core::errors::AppError;

#[derive(Clone)]
pub struct RedisClient {
    manager: ConnectionManager,
}

impl RedisClient {
    /// `REDIS_URL` 로 연결하고 PING 으로 확인합니다.
    pub async fn new() -> Result<Self, redis::RedisError> {
        let redis_url = env::var("REDIS_URL")
            .unwrap_or_else(|_| "redis://localhost:6379".to_string());

        let client = Client::open(redis_url)?;
        let mut manager = client.get_connection_manager().await?;

        redis::cmd("PING").query_async::<()>(&mut manager).await?;
        log::info!("✅ Redis 연결 성공");

        Ok(Self { manager })
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, redis::RedisError> {
        let mut conn = self.manager.clone();
        let value: Option<String> = conn.get(key).await?;

        match value {
            Some(json) => serde_json::from_str(&json).map(Some).map_err(|e| {
                redis::RedisError::from((
                    redis::ErrorKind::TypeError,
                    "Deserialization failed",
                    e.to_string(),
                ))
            }),
            None => Ok(None),
        }
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), redis::RedisError> {
        let json = to_json(value)?;
        let mut conn = self.manager.clone();
        conn.set(key, json).await
    }

    pub async fn set_with_expiry<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        seconds: u64,
    ) -> Result<(), redis::RedisError> {
        let json = to_json(value)?;
        let mut conn = self.manager.clone();
        conn.set_ex(key, json, seconds).await
    }

    pub async fn del(&self, key: &str) -> Result<(), redis::RedisError> {
        let mut conn = self.manager.clone();
        conn.del(key).await
    }

    pub async fn del_multiple(&self, keys: &[String]) -> Result<(), redis::RedisError> {
        if keys.is_empty() {
            return Ok(());
        }

        let mut conn = self.manager.clone();
        conn.del(keys).await
    }

    pub async fn keys(&self, pattern: &str) -> Result<Vec<String>, redis::RedisError> {
        let mut conn = self.manager.clone();
        conn.keys(pattern).await
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, redis::RedisError> {
    serde_json::to_string(value).map_err(|e| {
        redis::RedisError::from((
            redis::ErrorKind::TypeError,
            "Serialization failed",
            e.to_string(),
        ))
    })
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::RedisError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_json_serializes_value() {
        let json = to_json(&vec!["a", "b"]).unwrap();
        assert_eq!(json, r#"["a","b"]"#);
    }
}
