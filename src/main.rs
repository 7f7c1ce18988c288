//! 여행 공유 백엔드 메인 애플리케이션
//!
//! MongoDB, Redis, 실시간 이벤트 허브를 준비한 뒤 Actix-web 서버를 띄웁니다.

use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::http::header;
use actix_web::{middleware, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};
use travel_share_backend::caching::redis::RedisClient;
use travel_share_backend::config::{CorsConfig, RateLimitConfig, ServerConfig};
use travel_share_backend::core::registry::ServiceLocator;
use travel_share_backend::db::Database;
use travel_share_backend::realtime::EventHub;
use travel_share_backend::routes::configure_all_routes;
use travel_share_backend::utils::display_terminal::print_server_banner;

#[actix_web::main]
async fn main() -> io::Result<()> {
    load_env_file();
    init_logging();

    info!("🚀 여행 공유 서비스 시작중...");

    let (database, redis_client) = initialize_data_stores().await?;

    ServiceLocator::set(database);
    ServiceLocator::set(redis_client);
    ServiceLocator::set(Arc::new(EventHub::new()));

    ServiceLocator::initialize_all().await.map_err(|e| {
        error!("❌ 서비스 초기화 실패: {}", e);
        io::Error::other(e.to_string())
    })?;

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    start_http_server().await
}

/// CORS, rate limit, 로깅, 경로 정규화 미들웨어를 건 HTTP 서버를 실행합니다.
async fn start_http_server() -> io::Result<()> {
    let bind_address = ServerConfig::bind_address();

    let rate_limit = RateLimitConfig::load();
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(rate_limit.per_second)
        .burst_size(rate_limit.burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| {
            error!("❌ Rate limit 설정이 잘못되었습니다: {:?}", rate_limit);
            io::Error::new(io::ErrorKind::InvalidInput, "invalid rate limit configuration")
        })?;

    info!(
        "🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개",
        rate_limit.per_second, rate_limit.burst_size
    );

    let allowed_origins = CorsConfig::allowed_origins();
    info!("🌍 CORS 허용 Origin: {:?}", allowed_origins);

    print_server_banner(&bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Governor::new(&governor_conf))
            .wrap(configure_cors(&allowed_origins))
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_all_routes)
    })
    .bind(bind_address.as_str())?
    .workers(ServerConfig::workers())
    .run()
    .await
}

/// `PROFILE` 에 맞는 `.env.*` 파일을 읽습니다. (`dev` 기본)
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    match profile.as_str() {
        "prod" => match dotenv::from_filename(".env.prod") {
            Ok(_) => info!(".env.prod 파일 로드 됨"),
            Err(e) => error!(".env.prod 파일 로드 실패: {}", e),
        },
        "dev" => match dotenv::from_filename(".env.dev") {
            Ok(_) => info!(".env.dev 파일 로드 됨"),
            Err(e) => error!(".env.dev 파일 로드 실패: {}", e),
        },
        _ => {
            dotenv().ok();
            info!("기본 .env 파일 로드");
        }
    }
}

fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=debug"));
}

/// MongoDB와 Redis 연결을 만듭니다. 어느 쪽이든 실패하면 기동을 중단합니다.
async fn initialize_data_stores() -> io::Result<(Arc<Database>, Arc<RedisClient>)> {
    info!("📡 데이터베이스 연결 중...");

    let database = Database::new().await.map_err(|e| {
        error!("❌ MongoDB 연결 실패: {}", e);
        io::Error::new(io::ErrorKind::ConnectionRefused, e.to_string())
    })?;
    info!("✅ MongoDB 연결 성공");

    let redis_client = RedisClient::new().await.map_err(|e| {
        error!("❌ Redis 연결 실패: {}", e);
        io::Error::new(io::ErrorKind::ConnectionRefused, e.to_string())
    })?;
    info!("✅ Redis 연결 성공");

    Ok((Arc::new(database), Arc::new(redis_client)))
}

fn configure_cors(allowed_origins: &[String]) -> Cors {
    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .supports_credentials()
        .max_age(3600)
}
