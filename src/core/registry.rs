//! # Service Registry - 싱글톤 의존성 주입 시스템
//!
//! Spring의 `ApplicationContext` 역할을 하는 전역 컨테이너입니다.
//!
//! | Spring 개념 | 이 시스템 |
//! |-------------|-----------|
//! | `ApplicationContext` | `ServiceLocator` |
//! | `@Component` 스캔 | `inventory::submit!` 등록 |
//! | `@PostConstruct` | `Repository::init` / `Service::init` |
//! | `@Scope("singleton")` | 각 컴포넌트의 `instance()` + `OnceCell` |
//!
//! ## 동작 방식
//!
//! ```text
//! 1. 인프라 등록 (main)
//!    └─ ServiceLocator::set(Arc<Database>), set(Arc<RedisClient>), set(Arc<EventHub>)
//!
//! 2. initialize_all()
//!    ├─ RepositoryRegistration 순회 → 인스턴스 생성 → init() (인덱스 생성)
//!    └─ ServiceRegistration 순회 → 인스턴스 생성 → init()
//!
//! 3. 요청 처리
//!    └─ XService::instance() → 이미 생성된 싱글톤 반환
//! ```
//!
//! 리포지토리와 서비스는 자기 자신의 `OnceCell` 을 통해 생성되며,
//! `ServiceLocator` 에는 직접 등록된 인프라 컴포넌트만 타입별로 보관됩니다.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use once_cell::sync::Lazy;

use crate::core::errors::{AppError, AppResult};
use crate::utils::display_terminal::{
    print_boxed_title, print_final_summary, print_step_complete, print_step_start, print_sub_task,
};

/// 비즈니스 로직 컴포넌트
#[async_trait]
pub trait Service: Send + Sync {
    fn name(&self) -> &str;

    /// 기동 시 한 번 호출되는 초기화 훅
    async fn init(&self) -> AppResult<()> {
        Ok(())
    }
}

/// 데이터 액세스 컴포넌트
#[async_trait]
pub trait Repository: Send + Sync {
    fn name(&self) -> &str;

    fn collection_name(&self) -> &str;

    /// 기동 시 한 번 호출됩니다. 인덱스 생성 등에 사용합니다.
    async fn init(&self) -> AppResult<()>;
}

pub struct ServiceRegistration {
    pub name: &'static str,
    pub constructor: fn() -> Arc<dyn Service>,
}

pub struct RepositoryRegistration {
    pub name: &'static str,
    pub constructor: fn() -> Arc<dyn Repository>,
}

inventory::collect!(ServiceRegistration);
inventory::collect!(RepositoryRegistration);

static LOCATOR: Lazy<ServiceLocator> = Lazy::new(ServiceLocator::new);

pub struct ServiceLocator {
    instances: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl ServiceLocator {
    fn new() -> Self {
        Self {
            instances: RwLock::new(HashMap::new()),
        }
    }

    /// 등록된 인스턴스를 반환합니다.
    ///
    /// # Panics
    ///
    /// `set` 으로 등록되지 않은 타입을 요청하면 패닉합니다.
    /// 기동 순서가 잘못된 경우에만 발생하는 배선 오류입니다.
    pub fn get<T: 'static + Send + Sync>() -> Arc<T> {
        match Self::try_get::<T>() {
            Some(instance) => instance,
            None => {
                let type_name = std::any::type_name::<T>();
                log::error!("❌ ServiceLocator에 등록되지 않은 타입: {}", type_name);
                panic!(
                    "Component not registered: {}. Register it with ServiceLocator::set() before use",
                    type_name
                );
            }
        }
    }

    pub fn try_get<T: 'static + Send + Sync>() -> Option<Arc<T>> {
        let instances = LOCATOR
            .instances
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        instances
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|instance| instance.downcast::<T>().ok())
    }

    pub fn set<T: 'static + Send + Sync>(instance: Arc<T>) {
        log::info!("📦 Registering: {}", short_type_name(std::any::type_name::<T>()));

        let mut instances = LOCATOR
            .instances
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        instances.insert(TypeId::of::<T>(), instance as Arc<dyn Any + Send + Sync>);
    }

    /// 등록된 모든 리포지토리와 서비스를 생성하고 초기화합니다.
    pub async fn initialize_all() -> AppResult<()> {
        print_boxed_title("🔄 INITIALIZING SERVICE REGISTRY");

        let repositories: Vec<_> = inventory::iter::<RepositoryRegistration>().collect();
        let repo_count = repositories.len();

        print_step_start(1, "Creating Repository instances");
        for registration in repositories {
            print_sub_task(registration.name, "Creating...");
            let repository = (registration.constructor)();
            repository.init().await.map_err(|e| {
                AppError::InternalError(format!("{} init failed: {}", registration.name, e))
            })?;
            print_sub_task(registration.name, "✓ Ready");
        }
        print_step_complete(1, "Repository instances created", repo_count);

        let services: Vec<_> = inventory::iter::<ServiceRegistration>().collect();
        let service_count = services.len();

        print_step_start(2, "Creating Service instances");
        for registration in services {
            print_sub_task(registration.name, "Creating...");
            let service = (registration.constructor)();
            service.init().await.map_err(|e| {
                AppError::InternalError(format!("{} init failed: {}", registration.name, e))
            })?;
            print_sub_task(registration.name, "✓ Ready");
        }
        print_step_complete(2, "Service instances created", service_count);

        print_final_summary(repo_count, service_count);
        Ok(())
    }
}

fn short_type_name(type_name: &str) -> &str {
    type_name.rsplit("::").next().unwrap_or(type_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker(u32);

    #[test]
    fn test_set_and_get_roundtrip() {
        ServiceLocator::set(Arc::new(Marker(7)));
        assert_eq!(ServiceLocator::get::<Marker>().0, 7);
    }

    #[test]
    fn test_try_get_missing_returns_none() {
        struct NeverRegistered;
        assert!(ServiceLocator::try_get::<NeverRegistered>().is_none());
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("travel_share_backend::db::Database"), "Database");
        assert_eq!(short_type_name("Plain"), "Plain");
    }
}
