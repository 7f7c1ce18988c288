//! # Configuration Module
//!
//! 환경 변수 기반 설정을 타입이 있는 접근자로 제공합니다.
//! 설정값은 `main` 에서 `PROFILE` 에 맞는 `.env.*` 파일을 읽은 뒤 사용됩니다.
//!
//! - [`data_config`]: 서버, 환경, 비밀번호 해싱, 캐시, 페이지네이션, rate limit, CORS
//! - [`auth_config`]: JWT, Google 로그인, 인증 프로바이더
//!
//! ```rust,ignore
//! use travel_share_backend::config::{ServerConfig, JwtConfig};
//!
//! let address = ServerConfig::bind_address();
//! let ttl = JwtConfig::access_expiration_seconds();
//! ```
//!
//! 필수 환경 변수:
//!
//! ```bash
//! MONGODB_URI="mongodb://localhost:27017/?replicaSet=rs0"
//! DATABASE_NAME="travel_share"
//! REDIS_URL="redis://127.0.0.1:6379"
//! JWT_SECRET="..."
//! JWT_REFRESH_SECRET="..."
//! ```

pub mod data_config;
pub mod auth_config;

pub use data_config::*;
pub use auth_config::*;
