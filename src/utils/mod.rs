//! 공통 유틸리티 함수 모듈
//!
//! - [`string_utils`]: 입력 정리, 슬러그 생성
//! - [`bot_detection`]: 크롤러 User-Agent 판별
//! - [`render_html`]: 크롤러용 HTML 렌더링
//! - [`display_terminal`]: 기동 과정 출력

pub mod string_utils;
pub mod bot_detection;
pub mod render_html;
pub mod display_terminal;
