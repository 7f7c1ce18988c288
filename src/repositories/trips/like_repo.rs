//! # 좋아요 리포지토리
//!
//! 한 사용자는 한 여행에 좋아요를 한 번만 누를 수 있습니다 (`(trip_id, owner)` unique).

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson};
use mongodb::options::IndexOptions;
use mongodb::{ClientSession, Collection, IndexModel};
use once_cell::sync::OnceCell;

use crate::core::errors::{AppError, AppResult};
use crate::core::registry::{Repository, RepositoryRegistration, ServiceLocator};
use crate::db::Database;
use crate::domain::entities::trips::Like;
use crate::repositories::{is_duplicate_key_error, LIKES_COLLECTION};

static LIKE_REPOSITORY_INSTANCE: OnceCell<Arc<LikeRepository>> = OnceCell::new();

pub struct LikeRepository {
    collection: Collection<Like>,
}

impl LikeRepository {
    pub fn instance() -> Arc<Self> {
        LIKE_REPOSITORY_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    fn new() -> Self {
        let database = ServiceLocator::get::<Database>();

        Self {
            collection: database.get_database().collection::<Like>(LIKES_COLLECTION),
        }
    }

    pub async fn find_by_trip(&self, trip_id: &ObjectId) -> AppResult<Vec<Like>> {
        let cursor = self
            .collection
            .find(doc! { "trip_id": trip_id })
            .sort(doc! { "created_at": 1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    pub async fn find_one(&self, trip_id: &ObjectId, owner: &ObjectId) -> AppResult<Option<Like>> {
        Ok(self
            .collection
            .find_one(doc! { "trip_id": trip_id, "owner": owner })
            .await?)
    }

    /// 주어진 여행 중 사용자가 좋아요를 누른 여행 ID (hex)
    pub async fn liked_trip_ids(&self, owner: &ObjectId, trip_ids: &[ObjectId]) -> AppResult<HashSet<String>> {
        if trip_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let values = self
            .collection
            .distinct("trip_id", doc! { "owner": owner, "trip_id": { "$in": trip_ids.to_vec() } })
            .await?;

        Ok(values
            .iter()
            .filter_map(Bson::as_object_id)
            .map(|id| id.to_hex())
            .collect())
    }

    /// 중복 좋아요는 409.
    pub async fn insert(&self, mut like: Like) -> AppResult<Like> {
        let result = self.collection.insert_one(&like).await.map_err(|e| {
            if is_duplicate_key_error(&e) {
                AppError::ConflictError("Trip already liked".to_string())
            } else {
                AppError::from(e)
            }
        })?;

        like.id = result.inserted_id.as_object_id();
        if like.id.is_none() {
            return Err(AppError::InternalError("Inserted like has no ObjectId".to_string()));
        }

        Ok(like)
    }

    pub async fn delete_by_id(&self, id: &ObjectId) -> AppResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    pub async fn count_for_trip(&self, trip_id: &ObjectId) -> AppResult<u64> {
        Ok(self.collection.count_documents(doc! { "trip_id": trip_id }).await?)
    }

    pub async fn delete_by_trip(&self, trip_id: &ObjectId) -> AppResult<u64> {
        let result = self.collection.delete_many(doc! { "trip_id": trip_id }).await?;
        Ok(result.deleted_count)
    }

    pub async fn liked_trip_ids_in(&self, session: &mut ClientSession, owner: &ObjectId) -> AppResult<Vec<ObjectId>> {
        let values = self
            .collection
            .distinct("trip_id", doc! { "owner": owner })
            .session(&mut *session)
            .await?;

        Ok(values.iter().filter_map(Bson::as_object_id).collect())
    }

    pub async fn delete_by_owner_in(&self, session: &mut ClientSession, owner: &ObjectId) -> AppResult<u64> {
        let result = self
            .collection
            .delete_many(doc! { "owner": owner })
            .session(&mut *session)
            .await?;

        Ok(result.deleted_count)
    }

    pub async fn delete_by_trips_in(&self, session: &mut ClientSession, trip_ids: &[ObjectId]) -> AppResult<u64> {
        if trip_ids.is_empty() {
            return Ok(0);
        }

        let result = self
            .collection
            .delete_many(doc! { "trip_id": { "$in": trip_ids.to_vec() } })
            .session(&mut *session)
            .await?;

        Ok(result.deleted_count)
    }

    pub async fn count_for_trip_in(&self, session: &mut ClientSession, trip_id: &ObjectId) -> AppResult<u64> {
        Ok(self
            .collection
            .count_documents(doc! { "trip_id": trip_id })
            .session(&mut *session)
            .await?)
    }

    pub async fn create_indexes(&self) -> AppResult<()> {
        let unique_like = IndexModel::builder()
            .keys(doc! { "trip_id": 1, "owner": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("trip_owner_unique".to_string())
                    .build(),
            )
            .build();

        let owner_index = IndexModel::builder()
            .keys(doc! { "owner": 1 })
            .options(IndexOptions::builder().name("owner".to_string()).build())
            .build();

        self.collection.create_indexes([unique_like, owner_index]).await?;
        Ok(())
    }
}

#[async_trait]
impl Repository for LikeRepository {
    fn name(&self) -> &str {
        "like_repository"
    }

    fn collection_name(&self) -> &str {
        LIKES_COLLECTION
    }

    async fn init(&self) -> AppResult<()> {
        self.create_indexes().await
    }
}

fn like_repository_constructor() -> Arc<dyn Repository> {
    LikeRepository::instance()
}

inventory::submit! {
    RepositoryRegistration {
        name: "like_repository",
        constructor: like_repository_constructor,
    }
}
