use serde::{Deserialize, Serialize};

use crate::domain::entities::users::user::User;
use crate::domain::models::token::TokenPair;

/// 사용자 공개 정보. 비밀번호 해시와 리프레시 토큰은 절대 포함하지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub user_name: String,
    pub img_url: Option<String>,
    pub favorite_trips: Vec<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id_string().unwrap_or_default(),
            email: user.email,
            user_name: user.user_name,
            img_url: user.img_url,
            favorite_trips: user.favorite_trips,
        }
    }
}

/// 회원가입/로그인/Google 로그인 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_name: String,
    pub email: String,
    pub img_url: Option<String>,
    pub access_token: String,
    pub refresh_token: String,
}

impl AuthResponse {
    pub fn new(user: &User, tokens: TokenPair) -> Self {
        Self {
            id: user.id_string().unwrap_or_default(),
            user_name: user.user_name.clone(),
            email: user.email.clone(),
            img_url: user.img_url.clone(),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesResponse {
    pub message: String,
    pub favorite_trips: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordCheckResponse {
    pub is_valid: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
