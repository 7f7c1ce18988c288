//! JWT 클레임과 토큰 쌍
//!
//! 액세스 토큰과 리프레시 토큰은 같은 클레임 구조를 쓰지만
//! 서로 다른 키로 서명됩니다 (`TokenKind`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// 사용자 ID (hex)
    #[serde(rename = "_id")]
    pub user_id: String,
    pub iat: i64,
    pub exp: i64,
    /// 같은 초에 발급된 토큰끼리도 구별되도록 넣는 고유값
    pub jti: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}
