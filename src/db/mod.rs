//! Database Connection Management Module
//!
//! MongoDB 연결과 트랜잭션 세션을 관리합니다.
//!
//! ```bash
//! # 트랜잭션(사용자 삭제 cascade)을 쓰려면 replica set 이 필요합니다
//! export MONGODB_URI="mongodb://localhost:27017/?replicaSet=rs0"
//! export DATABASE_NAME="travel_share"
//! ```
//!
//! ```rust,ignore
//! let database = Arc::new(Database::new().await?);
//! ServiceLocator::set(database);
//! ```

use std::env;

use log::info;
use mongodb::options::ClientOptions;
use mongodb::{Client, ClientSession};

use crate::core::errors::AppResult;

#[derive(Clone)]
pub struct Database {
    client: Client,
    database_name: String,
}

impl Database {
    /// 환경 변수로 연결하고 `ping` 으로 가용성을 확인합니다.
    pub async fn new() -> AppResult<Self> {
        let mongodb_uri = env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let database_name = env::var("DATABASE_NAME")
            .unwrap_or_else(|_| "travel_share_dev".to_string());

        let mut client_options = ClientOptions::parse(&mongodb_uri).await?;
        client_options.app_name = Some("travel_share_backend".to_string());

        let client = Client::with_options(client_options)?;

        client
            .database(&database_name)
            .run_command(mongodb::bson::doc! { "ping": 1 })
            .await?;

        info!("✅ MongoDB 연결 성공: {}", database_name);

        Ok(Self {
            client,
            database_name,
        })
    }

    pub fn get_database(&self) -> mongodb::Database {
        self.client.database(&self.database_name)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// 트랜잭션이 시작된 세션을 반환합니다.
    ///
    /// 호출자는 `commit_transaction` 또는 `abort_transaction` 으로 끝내야 합니다.
    pub async fn begin_transaction(&self) -> AppResult<ClientSession> {
        let mut session = self.client.start_session().await?;
        session.start_transaction().await?;
        Ok(session)
    }
}
