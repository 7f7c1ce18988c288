//! # 사용자 리포지토리
//!
//! MongoDB `users` 컬렉션을 주 저장소로, Redis 를 ID 조회 캐시로 사용합니다.
//!
//! - `find_by_id` 는 캐시를 먼저 보고, 없으면 DB 조회 후 TTL 과 함께 저장합니다.
//! - 사용자 문서를 바꾸는 모든 메서드는 해당 캐시 키를 지웁니다.
//! - 캐시 오류는 요청을 실패시키지 않습니다.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use log::{debug, warn};
use mongodb::bson::{doc, oid::ObjectId, Bson, DateTime, Document};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{ClientSession, Collection, IndexModel};
use once_cell::sync::OnceCell;

use crate::caching::redis::RedisClient;
use crate::caching::user_cache_key;
use crate::config::CacheConfig;
use crate::core::errors::{AppError, AppResult};
use crate::core::registry::{Repository, RepositoryRegistration, ServiceLocator};
use crate::db::Database;
use crate::domain::entities::users::user::User;
use crate::repositories::{is_duplicate_key_error, USERS_COLLECTION};

static USER_REPOSITORY_INSTANCE: OnceCell<Arc<UserRepository>> = OnceCell::new();

pub struct UserRepository {
    collection: Collection<User>,
    redis: Arc<RedisClient>,
}

impl UserRepository {
    pub fn instance() -> Arc<Self> {
        USER_REPOSITORY_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    fn new() -> Self {
        let database = ServiceLocator::get::<Database>();
        let redis = ServiceLocator::get::<RedisClient>();

        Self {
            collection: database.get_database().collection::<User>(USERS_COLLECTION),
            redis,
        }
    }

    pub async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<User>> {
        let cache_key = user_cache_key(&id.to_hex());

        match self.redis.get::<User>(&cache_key).await {
            Ok(Some(cached)) => {
                debug!("캐시 적중: {}", cache_key);
                return Ok(Some(cached));
            }
            Ok(None) => {}
            Err(e) => warn!("⚠️ 사용자 캐시 조회 실패 ({}): {}", cache_key, e),
        }

        let user = self.collection.find_one(doc! { "_id": id }).await?;

        if let Some(ref user) = user {
            if let Err(e) = self
                .redis
                .set_with_expiry(&cache_key, user, CacheConfig::user_ttl_seconds())
                .await
            {
                warn!("⚠️ 사용자 캐시 저장 실패 ({}): {}", cache_key, e);
            }
        }

        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .collection
            .find_one(doc! { "email": email.trim().to_lowercase() })
            .await?)
    }

    pub async fn find_many_by_ids(&self, ids: &[ObjectId]) -> AppResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let cursor = self
            .collection
            .find(doc! { "_id": { "$in": ids.to_vec() } })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    /// 새 사용자를 저장합니다. 이메일이 이미 있으면 409.
    pub async fn create(&self, mut user: User) -> AppResult<User> {
        user.email = user.email.trim().to_lowercase();

        if self.find_by_email(&user.email).await?.is_some() {
            return Err(AppError::ConflictError("Email already in use".to_string()));
        }

        let result = self.collection.insert_one(&user).await.map_err(|e| {
            if is_duplicate_key_error(&e) {
                AppError::ConflictError("Email already in use".to_string())
            } else {
                AppError::from(e)
            }
        })?;

        user.id = result.inserted_id.as_object_id();
        if user.id.is_none() {
            return Err(AppError::InternalError("Inserted user has no ObjectId".to_string()));
        }

        Ok(user)
    }

    /// `$set` 으로 필드를 바꾸고 갱신된 문서를 반환합니다.
    pub async fn update_fields(&self, id: &ObjectId, mut fields: Document) -> AppResult<Option<User>> {
        fields.insert("updated_at", DateTime::now());

        let normalized_email = match fields.get("email") {
            Some(Bson::String(email)) => Some(email.trim().to_lowercase()),
            _ => None,
        };
        if let Some(email) = normalized_email {
            fields.insert("email", email);
        }

        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": fields })
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| {
                if is_duplicate_key_error(&e) {
                    AppError::ConflictError("Email already in use".to_string())
                } else {
                    AppError::from(e)
                }
            })?;

        self.invalidate_cache(id).await;
        Ok(updated)
    }

    pub async fn push_refresh_token(&self, id: &ObjectId, token_hash: &str) -> AppResult<()> {
        self.collection
            .update_one(
                doc! { "_id": id },
                doc! {
                    "$push": { "refresh_tokens": token_hash },
                    "$set": { "updated_at": DateTime::now() },
                },
            )
            .await?;

        self.invalidate_cache(id).await;
        Ok(())
    }

    pub async fn replace_refresh_tokens(&self, id: &ObjectId, token_hashes: Vec<String>) -> AppResult<()> {
        self.collection
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "refresh_tokens": token_hashes, "updated_at": DateTime::now() } },
            )
            .await?;

        self.invalidate_cache(id).await;
        Ok(())
    }

    /// 즐겨찾기 추가. 이미 있으면 409, 사용자가 없으면 404.
    pub async fn add_favorite(&self, id: &ObjectId, trip_id: &str) -> AppResult<User> {
        let updated = self
            .collection
            .find_one_and_update(
                doc! { "_id": id, "favorite_trips": { "$ne": trip_id } },
                doc! {
                    "$push": { "favorite_trips": trip_id },
                    "$set": { "updated_at": DateTime::now() },
                },
            )
            .return_document(ReturnDocument::After)
            .await?;

        self.invalidate_cache(id).await;

        match updated {
            Some(user) => Ok(user),
            None => match self.collection.find_one(doc! { "_id": id }).await? {
                Some(_) => Err(AppError::ConflictError("Trip already in favorites".to_string())),
                None => Err(AppError::NotFound("User not found".to_string())),
            },
        }
    }

    pub async fn remove_favorite(&self, id: &ObjectId, trip_id: &str) -> AppResult<Option<User>> {
        let updated = self
            .collection
            .find_one_and_update(
                doc! { "_id": id },
                doc! {
                    "$pull": { "favorite_trips": trip_id },
                    "$set": { "updated_at": DateTime::now() },
                },
            )
            .return_document(ReturnDocument::After)
            .await?;

        self.invalidate_cache(id).await;
        Ok(updated)
    }

    /// 삭제된 여행을 모든 사용자의 즐겨찾기에서 뺍니다.
    pub async fn remove_trip_from_all_favorites(&self, trip_id: &str) -> AppResult<u64> {
        let affected = self
            .collection
            .distinct("_id", doc! { "favorite_trips": trip_id })
            .await?;

        let result = self
            .collection
            .update_many(
                doc! { "favorite_trips": trip_id },
                doc! { "$pull": { "favorite_trips": trip_id } },
            )
            .await?;

        self.invalidate_many(&bson_ids(&affected)).await;
        Ok(result.modified_count)
    }

    /// 트랜잭션 안에서 여러 여행을 모든 즐겨찾기에서 뺍니다.
    ///
    /// 영향받은 사용자 ID를 돌려주므로 커밋 뒤 `invalidate_many` 로 캐시를 지우세요.
    pub async fn remove_trips_from_all_favorites_in(
        &self,
        session: &mut ClientSession,
        trip_ids: &[String],
    ) -> AppResult<Vec<ObjectId>> {
        if trip_ids.is_empty() {
            return Ok(Vec::new());
        }

        let filter = doc! { "favorite_trips": { "$in": trip_ids.to_vec() } };
        let affected = self
            .collection
            .distinct("_id", filter.clone())
            .session(&mut *session)
            .await?;

        self.collection
            .update_many(
                filter,
                doc! { "$pull": { "favorite_trips": { "$in": trip_ids.to_vec() } } },
            )
            .session(&mut *session)
            .await?;

        Ok(bson_ids(&affected))
    }

    pub async fn delete_in(&self, session: &mut ClientSession, id: &ObjectId) -> AppResult<bool> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id })
            .session(&mut *session)
            .await?;

        Ok(result.deleted_count > 0)
    }

    pub async fn invalidate_cache(&self, id: &ObjectId) {
        let cache_key = user_cache_key(&id.to_hex());
        if let Err(e) = self.redis.del(&cache_key).await {
            warn!("⚠️ 사용자 캐시 삭제 실패 ({}): {}", cache_key, e);
        }
    }

    pub async fn invalidate_many(&self, ids: &[ObjectId]) {
        let keys: Vec<String> = ids.iter().map(|id| user_cache_key(&id.to_hex())).collect();
        if let Err(e) = self.redis.del_multiple(&keys).await {
            warn!("⚠️ 사용자 캐시 일괄 삭제 실패 ({}건): {}", keys.len(), e);
        }
    }

    pub async fn create_indexes(&self) -> AppResult<()> {
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("email_unique".to_string())
                    .build(),
            )
            .build();

        let favorites_index = IndexModel::builder()
            .keys(doc! { "favorite_trips": 1 })
            .options(IndexOptions::builder().name("favorite_trips".to_string()).build())
            .build();

        self.collection
            .create_indexes([email_index, favorites_index])
            .await?;

        Ok(())
    }
}

fn bson_ids(values: &[Bson]) -> Vec<ObjectId> {
    values.iter().filter_map(Bson::as_object_id).collect()
}

#[async_trait]
impl Repository for UserRepository {
    fn name(&self) -> &str {
        "user_repository"
    }

    fn collection_name(&self) -> &str {
        USERS_COLLECTION
    }

    async fn init(&self) -> AppResult<()> {
        self.create_indexes().await
    }
}

fn user_repository_constructor() -> Arc<dyn Repository> {
    UserRepository::instance()
}

inventory::submit! {
    RepositoryRegistration {
        name: "user_repository",
        constructor: user_repository_constructor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bson_ids_skips_non_object_ids() {
        let id = ObjectId::new();
        let values = vec![Bson::ObjectId(id), Bson::String("x".to_string()), Bson::Null];
        assert_eq!(bson_ids(&values), vec![id]);
    }
}
