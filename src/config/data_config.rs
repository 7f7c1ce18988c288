//! 데이터 및 서버 설정 관리 모듈
//!
//! 서버 바인딩, 환경 구분, 비밀번호 해싱, 캐시, 페이지네이션,
//! 요청 제한(rate limit), CORS 설정을 환경 변수에서 읽습니다.

use std::env;
use std::str::FromStr;

/// 환경 변수를 파싱하고, 없거나 형식이 틀리면 기본값을 사용합니다.
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    parse_or(env::var(key).ok().as_deref(), default)
}

fn parse_or<T: FromStr>(raw: Option<&str>, default: T) -> T {
    match raw.map(|value| value.trim().parse::<T>()) {
        Some(Ok(value)) => value,
        Some(Err(_)) => {
            log::warn!("설정값 파싱 실패: {:?}. 기본값 사용", raw);
            default
        }
        None => default,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    pub fn current() -> Self {
        let raw = env::var("ENVIRONMENT")
            .or_else(|_| env::var("NODE_ENV"))
            .unwrap_or_else(|_| "production".to_string());

        Self::from_name(&raw)
    }

    pub fn from_name(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }
}

pub struct PasswordConfig;

impl PasswordConfig {
    /// `BCRYPT_COST` (4..=15) 우선, 아니면 환경별 기본값
    pub fn bcrypt_cost() -> u32 {
        match env::var("BCRYPT_COST").ok().and_then(|raw| raw.parse::<u32>().ok()) {
            Some(cost) if (4..=15).contains(&cost) => cost,
            _ => Self::bcrypt_cost_for_env(&Environment::current()),
        }
    }

    pub fn bcrypt_cost_for_env(env: &Environment) -> u32 {
        match env {
            Environment::Development => 4,
            Environment::Test => 4,
            Environment::Staging => 10,
            Environment::Production => 12,
        }
    }
}

pub struct ServerConfig;

impl ServerConfig {
    pub fn port() -> u16 {
        env_or("PORT", 3000)
    }

    pub fn host() -> String {
        env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string())
    }

    pub fn workers() -> usize {
        env_or("SERVER_WORKERS", 4)
    }

    pub fn bind_address() -> String {
        format!("{}:{}", Self::host(), Self::port())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub per_second: u64,
    pub burst_size: u32,
}

impl RateLimitConfig {
    pub fn load() -> Self {
        Self {
            per_second: env_or("RATE_LIMIT_PER_SECOND", 100),
            burst_size: env_or("RATE_LIMIT_BURST_SIZE", 200),
        }
    }
}

pub struct CorsConfig;

impl CorsConfig {
    /// 쉼표로 구분된 `CORS_ALLOWED_ORIGINS`
    pub fn allowed_origins() -> Vec<String> {
        Self::parse_origins(env::var("CORS_ALLOWED_ORIGINS").ok().as_deref())
    }

    fn parse_origins(raw: Option<&str>) -> Vec<String> {
        let origins: Vec<String> = raw
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() {
            vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ]
        } else {
            origins
        }
    }
}

pub struct CacheConfig;

impl CacheConfig {
    pub fn user_ttl_seconds() -> u64 {
        env_or("USER_CACHE_TTL_SECONDS", 600)
    }
}

pub struct PaginationConfig;

impl PaginationConfig {
    pub const DEFAULT_PAGE: u64 = 1;
    pub const DEFAULT_LIMIT: u64 = 10;
    pub const MAX_LIMIT: u64 = 100;
    pub const MAX_PAGE: u64 = 1_000_000;

    /// 0 이하의 값은 기본값으로, 지나치게 큰 page/limit 는 최대값으로 맞춥니다.
    pub fn normalize(page: Option<u64>, limit: Option<u64>) -> (u64, u64) {
        let page = page
            .filter(|p| *p > 0)
            .unwrap_or(Self::DEFAULT_PAGE)
            .min(Self::MAX_PAGE);
        let limit = limit
            .filter(|l| *l > 0)
            .unwrap_or(Self::DEFAULT_LIMIT)
            .min(Self::MAX_LIMIT);

        (page, limit)
    }

    /// 정규화된 page/limit 에 대한 건너뛸 문서 수
    pub fn skip(page: u64, limit: u64) -> u64 {
        page.saturating_sub(1).saturating_mul(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_name() {
        assert_eq!(Environment::from_name("development"), Environment::Development);
        assert_eq!(Environment::from_name("DEV"), Environment::Development);
        assert_eq!(Environment::from_name("test"), Environment::Test);
        assert_eq!(Environment::from_name("stage"), Environment::Staging);
        assert_eq!(Environment::from_name("unknown"), Environment::Production);
    }

    #[test]
    fn test_bcrypt_cost_for_each_environment() {
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Development), 4);
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Test), 4);
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Staging), 10);
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Production), 12);
    }

    #[test]
    fn test_parse_or() {
        assert_eq!(parse_or::<u16>(Some("8081"), 3000), 8081);
        assert_eq!(parse_or::<u16>(Some(" 8082 "), 3000), 8082);
        assert_eq!(parse_or::<u16>(Some("not-a-port"), 3000), 3000);
        assert_eq!(parse_or::<u16>(None, 3000), 3000);
    }

    #[test]
    fn test_cors_origins() {
        assert_eq!(
            CorsConfig::parse_origins(Some("https://a.example, https://b.example,")),
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert_eq!(CorsConfig::parse_origins(None).len(), 4);
        assert_eq!(CorsConfig::parse_origins(Some(" , ")).len(), 4);
    }

    #[test]
    fn test_pagination_normalize() {
        assert_eq!(PaginationConfig::normalize(None, None), (1, 10));
        assert_eq!(PaginationConfig::normalize(Some(0), Some(0)), (1, 10));
        assert_eq!(PaginationConfig::normalize(Some(3), Some(25)), (3, 25));
        assert_eq!(PaginationConfig::normalize(Some(2), Some(1000)), (2, 100));
    }

    #[test]
    fn test_pagination_huge_page_is_capped() {
        let (page, limit) = PaginationConfig::normalize(Some(u64::MAX), Some(10));
        assert_eq!(page, PaginationConfig::MAX_PAGE);
        assert_eq!(PaginationConfig::skip(page, limit), (PaginationConfig::MAX_PAGE - 1) * 10);
        assert!(PaginationConfig::skip(page, limit) <= i64::MAX as u64);
    }

    #[test]
    fn test_pagination_skip() {
        assert_eq!(PaginationConfig::skip(1, 10), 0);
        assert_eq!(PaginationConfig::skip(3, 25), 50);
        assert_eq!(PaginationConfig::skip(0, 10), 0);
        assert_eq!(PaginationConfig::skip(u64::MAX, u64::MAX), u64::MAX);
    }

    #[test]
    fn test_server_config_defaults() {
        if env::var("PORT").is_err() {
            assert_eq!(ServerConfig::port(), 3000);
        }
        if env::var("HOST").is_err() {
            assert_eq!(ServerConfig::host(), "127.0.0.1");
        }
    }
}
