//! # 여행 리포지토리
//!
//! `trips` 컬렉션 CRUD 와 카운터/슬러그 관련 쿼리를 담당합니다.
//! 목록 조회는 최신순(`created_at` 내림차순)입니다.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, DateTime, Document};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{ClientSession, Collection, IndexModel};
use once_cell::sync::OnceCell;

use crate::core::errors::{AppError, AppResult};
use crate::core::registry::{Repository, RepositoryRegistration, ServiceLocator};
use crate::db::Database;
use crate::domain::entities::trips::Trip;
use crate::repositories::{is_duplicate_key_error, TRIPS_COLLECTION};

static TRIP_REPOSITORY_INSTANCE: OnceCell<Arc<TripRepository>> = OnceCell::new();

pub struct TripRepository {
    collection: Collection<Trip>,
}

impl TripRepository {
    pub fn instance() -> Arc<Self> {
        TRIP_REPOSITORY_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    fn new() -> Self {
        let database = ServiceLocator::get::<Database>();

        Self {
            collection: database.get_database().collection::<Trip>(TRIPS_COLLECTION),
        }
    }

    pub async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Trip>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Trip>> {
        Ok(self.collection.find_one(doc! { "slug": slug }).await?)
    }

    /// `exclude` 로 지정한 여행은 제외하고 슬러그 사용 여부를 확인합니다.
    pub async fn slug_exists(&self, slug: &str, exclude: Option<&ObjectId>) -> AppResult<bool> {
        let mut filter = doc! { "slug": slug };
        if let Some(id) = exclude {
            filter.insert("_id", doc! { "$ne": id });
        }

        let count = self.collection.count_documents(filter).limit(1).await?;
        Ok(count > 0)
    }

    /// 한 페이지와 전체 개수
    pub async fn find_page(&self, skip: u64, limit: u64) -> AppResult<(Vec<Trip>, u64)> {
        let total = self.collection.count_documents(doc! {}).await?;

        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .skip(skip)
            .limit(limit as i64)
            .await?;

        Ok((cursor.try_collect().await?, total))
    }

    pub async fn find_by_owner(&self, owner_id: &ObjectId) -> AppResult<Vec<Trip>> {
        self.find_sorted(doc! { "owner_id": owner_id }).await
    }

    pub async fn find_by_ids(&self, ids: &[ObjectId]) -> AppResult<Vec<Trip>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.find_sorted(doc! { "_id": { "$in": ids.to_vec() } }).await
    }

    pub async fn search(&self, filter: Document) -> AppResult<Vec<Trip>> {
        self.find_sorted(filter).await
    }

    async fn find_sorted(&self, filter: Document) -> AppResult<Vec<Trip>> {
        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    /// 저장 후 ID 가 채워진 여행을 반환합니다. 슬러그 충돌은 409.
    pub async fn insert(&self, mut trip: Trip) -> AppResult<Trip> {
        let result = self.collection.insert_one(&trip).await.map_err(|e| {
            if is_duplicate_key_error(&e) {
                AppError::ConflictError(format!("Slug already taken: {}", trip.slug))
            } else {
                AppError::from(e)
            }
        })?;

        trip.id = result.inserted_id.as_object_id();
        if trip.id.is_none() {
            return Err(AppError::InternalError("Inserted trip has no ObjectId".to_string()));
        }

        Ok(trip)
    }

    pub async fn update_fields(&self, id: &ObjectId, mut fields: Document) -> AppResult<Option<Trip>> {
        fields.insert("updated_at", DateTime::now());

        self.collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": fields })
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| {
                if is_duplicate_key_error(&e) {
                    AppError::ConflictError("Slug already taken".to_string())
                } else {
                    AppError::from(e)
                }
            })
    }

    pub async fn set_like_count(&self, id: &ObjectId, count: u64) -> AppResult<Option<Trip>> {
        self.update_fields(id, doc! { "num_of_likes": count_to_i32(count) }).await
    }

    pub async fn set_comment_count(&self, id: &ObjectId, count: u64) -> AppResult<Option<Trip>> {
        self.update_fields(id, doc! { "num_of_comments": count_to_i32(count) }).await
    }

    /// 작성자 프로필이 바뀌면 여행 문서의 사본도 맞춥니다.
    pub async fn update_owner_display(
        &self,
        owner_id: &ObjectId,
        user_name: &str,
        img_url: Option<&str>,
    ) -> AppResult<u64> {
        let img_url = img_url.map(Bson::from).unwrap_or(Bson::Null);

        let result = self
            .collection
            .update_many(
                doc! { "owner_id": owner_id },
                doc! { "$set": { "user_name": user_name, "img_url": img_url } },
            )
            .await?;

        Ok(result.modified_count)
    }

    pub async fn delete_by_id(&self, id: &ObjectId) -> AppResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    pub async fn owned_ids_in(&self, session: &mut ClientSession, owner_id: &ObjectId) -> AppResult<Vec<ObjectId>> {
        let values = self
            .collection
            .distinct("_id", doc! { "owner_id": owner_id })
            .session(&mut *session)
            .await?;

        Ok(values.iter().filter_map(Bson::as_object_id).collect())
    }

    pub async fn delete_by_owner_in(&self, session: &mut ClientSession, owner_id: &ObjectId) -> AppResult<u64> {
        let result = self
            .collection
            .delete_many(doc! { "owner_id": owner_id })
            .session(&mut *session)
            .await?;

        Ok(result.deleted_count)
    }

    pub async fn set_counts_in(
        &self,
        session: &mut ClientSession,
        id: &ObjectId,
        likes: u64,
        comments: u64,
    ) -> AppResult<()> {
        self.collection
            .update_one(
                doc! { "_id": id },
                doc! { "$set": {
                    "num_of_likes": count_to_i32(likes),
                    "num_of_comments": count_to_i32(comments),
                    "updated_at": DateTime::now(),
                } },
            )
            .session(&mut *session)
            .await?;

        Ok(())
    }

    pub async fn create_indexes(&self) -> AppResult<()> {
        let slug_index = IndexModel::builder()
            .keys(doc! { "slug": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("slug_unique".to_string())
                    .build(),
            )
            .build();

        let owner_index = IndexModel::builder()
            .keys(doc! { "owner_id": 1 })
            .options(IndexOptions::builder().name("owner_id".to_string()).build())
            .build();

        let created_at_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(IndexOptions::builder().name("created_at_desc".to_string()).build())
            .build();

        self.collection
            .create_indexes([slug_index, owner_index, created_at_index])
            .await?;

        Ok(())
    }
}

fn count_to_i32(count: u64) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

#[async_trait]
impl Repository for TripRepository {
    fn name(&self) -> &str {
        "trip_repository"
    }

    fn collection_name(&self) -> &str {
        TRIPS_COLLECTION
    }

    async fn init(&self) -> AppResult<()> {
        self.create_indexes().await
    }
}

fn trip_repository_constructor() -> Arc<dyn Repository> {
    TripRepository::instance()
}

inventory::submit! {
    RepositoryRegistration {
        name: "trip_repository",
        constructor: trip_repository_constructor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_to_i32_saturates() {
        assert_eq!(count_to_i32(7), 7);
        assert_eq!(count_to_i32(u64::MAX), i32::MAX);
    }
}
