//! User Entity
//!
//! `users` 컬렉션에 저장되는 사용자 문서입니다.
//! 이메일/비밀번호 계정과 Google 계정을 하나의 모델로 다룹니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::config::AuthProvider;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// 로그인 식별자 (unique index)
    pub email: String,

    pub user_name: String,

    /// bcrypt 해시. Google 전용 계정은 `None`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img_url: Option<String>,

    pub auth_provider: AuthProvider,

    /// 발급되어 아직 유효한 리프레시 토큰의 SHA-256 해시 목록
    #[serde(default)]
    pub refresh_tokens: Vec<String>,

    /// 즐겨찾기한 여행 ID (hex)
    #[serde(default)]
    pub favorite_trips: Vec<String>,

    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl User {
    pub fn new_local(
        email: String,
        user_name: String,
        password_hash: String,
        img_url: Option<String>,
    ) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            email,
            user_name,
            password_hash: Some(password_hash),
            img_url,
            auth_provider: AuthProvider::Local,
            refresh_tokens: Vec::new(),
            favorite_trips: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn new_google(email: String, user_name: String, img_url: Option<String>) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            email,
            user_name,
            password_hash: None,
            img_url,
            auth_provider: AuthProvider::Google,
            refresh_tokens: Vec::new(),
            favorite_trips: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    pub fn can_authenticate_with_password(&self) -> bool {
        self.password_hash.is_some()
    }

    pub fn has_favorite(&self, trip_id: &str) -> bool {
        self.favorite_trips.iter().any(|id| id == trip_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_local_user_defaults() {
        let user = User::new_local(
            "dana@example.com".to_string(),
            "dana".to_string(),
            "$2b$04$hash".to_string(),
            None,
        );

        assert!(user.id.is_none());
        assert!(user.can_authenticate_with_password());
        assert!(user.refresh_tokens.is_empty());
        assert!(user.favorite_trips.is_empty());
        assert_eq!(user.auth_provider, AuthProvider::Local);
    }

    #[test]
    fn test_google_user_has_no_password() {
        let user = User::new_google("g@example.com".to_string(), "g".to_string(), None);
        assert!(!user.can_authenticate_with_password());
        assert_eq!(user.auth_provider, AuthProvider::Google);
    }

    #[test]
    fn test_missing_lists_deserialize_as_empty() {
        let document = mongodb::bson::doc! {
            "email": "old@example.com",
            "user_name": "old",
            "auth_provider": "local",
            "created_at": DateTime::now(),
            "updated_at": DateTime::now(),
        };

        let user: User = mongodb::bson::from_document(document).unwrap();
        assert!(user.refresh_tokens.is_empty());
        assert!(!user.has_favorite("abc"));
    }
}
