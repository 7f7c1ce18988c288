//! # 문자열 유틸리티
//!
//! 입력값 정리와 URL 슬러그 생성에 쓰이는 함수들입니다.

use deunicode::deunicode;
use serde::Deserialize;

use crate::core::errors::AppError;

/// 필수 문자열을 검증하고 앞뒤 공백을 제거합니다.
pub fn validate_required_string(value: &str, field_name: &str) -> Result<String, AppError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(AppError::ValidationError(format!("{} is required", field_name)));
    }

    Ok(trimmed.to_string())
}

/// 공백뿐인 값은 `None` 으로 취급합니다.
pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// serde 필드용: 빈 문자열을 `None` 으로 역직렬화
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(clean_optional_string(opt))
}

/// serde 필드용: 앞뒤 공백을 제거합니다. 공백뿐이면 빈 문자열이 되어 `length(min = 1)` 에 걸립니다.
pub fn deserialize_trimmed_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(value.trim().to_string())
}

/// 부분 수정용. 보낸 값은 공백만 제거하고 `Some` 으로 남겨 검증 대상이 되게 합니다.
pub fn deserialize_trimmed_option<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.map(|value| value.trim().to_string()))
}

/// 소문자 ASCII 슬러그로 변환합니다.
///
/// 유니코드는 먼저 ASCII 로 음역하고, 아포스트로피는 지웁니다.
/// 그 밖의 영숫자가 아닌 구간은 하나의 `-` 로 합쳐지고, 앞뒤 `-` 는 제거됩니다.
///
/// ```rust,ignore
/// assert_eq!(slugify("New Zealand-Road Trip!"), "new-zealand-road-trip");
/// assert_eq!(slugify("Côte d'Ivoire"), "cote-divoire");
/// ```
pub fn slugify(input: &str) -> String {
    let ascii = deunicode(input);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_dash = false;

    for ch in ascii.chars() {
        if ch == '\'' {
            continue;
        }
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// 선형 탐색용 슬러그 후보. `counter == 0` 이면 기본 슬러그 그대로입니다.
pub fn slug_candidate(base: &str, counter: u32) -> String {
    if counter == 0 {
        base.to_string()
    } else {
        format!("{}-{}", base, counter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required_string() {
        assert_eq!(validate_required_string("  Japan  ", "country").unwrap(), "Japan");
        assert!(validate_required_string("", "country").is_err());
        assert!(validate_required_string("\t\n", "country").is_err());
    }

    #[test]
    fn test_clean_optional_string() {
        assert_eq!(clean_optional_string(Some("  Hello ".to_string())), Some("Hello".to_string()));
        assert_eq!(clean_optional_string(Some("   ".to_string())), None);
        assert_eq!(clean_optional_string(None), None);
    }

    #[test]
    fn test_deserialize_optional_string() {
        #[derive(Deserialize)]
        struct Payload {
            #[serde(default, deserialize_with = "deserialize_optional_string")]
            img_url: Option<String>,
        }

        let payload: Payload = serde_json::from_str(r#"{"img_url": "  "}"#).unwrap();
        assert_eq!(payload.img_url, None);

        let payload: Payload = serde_json::from_str(r#"{"img_url": " a.png "}"#).unwrap();
        assert_eq!(payload.img_url, Some("a.png".to_string()));

        let payload: Payload = serde_json::from_str("{}").unwrap();
        assert_eq!(payload.img_url, None);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Japan-Family"), "japan-family");
        assert_eq!(slugify("New Zealand-Road Trip!"), "new-zealand-road-trip");
        assert_eq!(slugify("  --Italy--  "), "italy");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugify_transliterates_to_ascii() {
        let slug = slugify("Côte d'Ivoire-Solo");
        assert_eq!(slug, "cote-divoire-solo");
        assert!(slug.is_ascii());

        assert_eq!(slugify("São Tomé-Família"), "sao-tome-familia");
        assert_eq!(slugify("Curaçao’s Beaches"), "curacaos-beaches");
        assert!(slugify("日本-Family").is_ascii());
    }

    #[test]
    fn test_slug_candidate() {
        assert_eq!(slug_candidate("japan-family", 0), "japan-family");
        assert_eq!(slug_candidate("japan-family", 1), "japan-family-1");
        assert_eq!(slug_candidate("japan-family", 12), "japan-family-12");
    }
}
