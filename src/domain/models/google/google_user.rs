//! # Google ID 토큰 정보
//!
//! `https://oauth2.googleapis.com/tokeninfo?id_token=...` 응답 중
//! 로그인에 필요한 필드만 매핑합니다.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleTokenInfo {
    /// 토큰을 발급받은 OAuth 클라이언트 ID
    pub aud: String,
    /// Google 계정 고유 ID
    pub sub: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

impl GoogleTokenInfo {
    /// 이름이 없는 계정은 기본 표시 이름을 사용합니다.
    pub fn display_name(&self) -> String {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or("DefaultUserName")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_token_info() {
        let json = r#"{
            "aud": "client-1",
            "sub": "1098",
            "email": "g@example.com",
            "email_verified": "true",
            "name": "Gal",
            "picture": "https://img/p.png",
            "exp": "1700000000"
        }"#;

        let info: GoogleTokenInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.aud, "client-1");
        assert_eq!(info.display_name(), "Gal");
    }

    #[test]
    fn test_display_name_fallback() {
        let info: GoogleTokenInfo =
            serde_json::from_str(r#"{"aud": "a", "sub": "s", "name": "  "}"#).unwrap();
        assert_eq!(info.display_name(), "DefaultUserName");
    }
}
