//! 크롤러 User-Agent 판별
//!
//! 검색 엔진/SNS 미리보기 크롤러에게는 JSON 대신 OG 태그가 들어간 HTML 을 돌려줍니다.

use actix_web::http::header;
use actix_web::HttpRequest;
use once_cell::sync::Lazy;
use regex::Regex;

static BOT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Googlebot|facebookexternalhit|Twitterbot|bingbot|LinkedInBot|Yahoo|DuckDuckBot")
        .expect("valid bot pattern")
});

pub fn is_bot_user_agent(user_agent: &str) -> bool {
    BOT_PATTERN.is_match(user_agent)
}

/// `User-Agent` 헤더가 없으면 봇이 아닌 것으로 봅니다.
pub fn is_bot_request(req: &HttpRequest) -> bool {
    req.headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(is_bot_user_agent)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_known_crawlers() {
        assert!(is_bot_user_agent(
            "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)"
        ));
        assert!(is_bot_user_agent("facebookexternalhit/1.1"));
        assert!(is_bot_user_agent("Twitterbot/1.0"));
        assert!(is_bot_user_agent("DuckDuckBot/1.1"));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(is_bot_user_agent("mozilla/5.0 (compatible; BINGBOT/2.0)"));
        assert!(is_bot_user_agent("linkedinbot"));
    }

    #[test]
    fn test_regular_browser_is_not_bot() {
        assert!(!is_bot_user_agent(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/120.0 Safari/537.36"
        ));
    }

    #[test]
    fn test_request_header() {
        let bot = TestRequest::default()
            .insert_header((header::USER_AGENT, "Twitterbot/1.0"))
            .to_http_request();
        assert!(is_bot_request(&bot));

        let no_agent = TestRequest::default().to_http_request();
        assert!(!is_bot_request(&no_agent));
    }
}
