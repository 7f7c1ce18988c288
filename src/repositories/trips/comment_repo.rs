//! # 댓글 리포지토리
//!
//! 댓글은 작성 순서(`created_at` 오름차순)로 반환합니다.

use std::collections::HashMap;
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
use crate::domain::entities::trips::Comment;
use crate::repositories::COMMENTS_COLLECTION;

static COMMENT_REPOSITORY_INSTANCE: OnceCell<Arc<CommentRepository>> = OnceCell::new();

pub struct CommentRepository {
    collection: Collection<Comment>,
}

impl CommentRepository {
    pub fn instance() -> Arc<Self> {
        COMMENT_REPOSITORY_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    fn new() -> Self {
        let database = ServiceLocator::get::<Database>();

        Self {
            collection: database.get_database().collection::<Comment>(COMMENTS_COLLECTION),
        }
    }

    pub async fn find_by_trip(&self, trip_id: &ObjectId) -> AppResult<Vec<Comment>> {
        let cursor = self
            .collection
            .find(doc! { "trip_id": trip_id })
            .sort(doc! { "created_at": 1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    /// 여러 여행의 댓글을 여행 ID 별로 묶어 반환합니다.
    pub async fn find_by_trips(&self, trip_ids: &[ObjectId]) -> AppResult<HashMap<ObjectId, Vec<Comment>>> {
        if trip_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let cursor = self
            .collection
            .find(doc! { "trip_id": { "$in": trip_ids.to_vec() } })
            .sort(doc! { "created_at": 1 })
            .await?;
        let comments: Vec<Comment> = cursor.try_collect().await?;

        Ok(group_by_trip(comments))
    }

    pub async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Comment>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    pub async fn insert(&self, mut comment: Comment) -> AppResult<Comment> {
        let result = self.collection.insert_one(&comment).await?;

        comment.id = result.inserted_id.as_object_id();
        if comment.id.is_none() {
            return Err(AppError::InternalError("Inserted comment has no ObjectId".to_string()));
        }

        Ok(comment)
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

    /// 사용자가 댓글을 남긴 여행 ID 목록
    pub async fn commented_trip_ids_in(
        &self,
        session: &mut ClientSession,
        owner_id: &ObjectId,
    ) -> AppResult<Vec<ObjectId>> {
        let values = self
            .collection
            .distinct("trip_id", doc! { "owner_id": owner_id })
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
        let trip_index = IndexModel::builder()
            .keys(doc! { "trip_id": 1, "created_at": 1 })
            .options(IndexOptions::builder().name("trip_id_created_at".to_string()).build())
            .build();

        let owner_index = IndexModel::builder()
            .keys(doc! { "owner_id": 1 })
            .options(IndexOptions::builder().name("owner_id".to_string()).build())
            .build();

        self.collection.create_indexes([trip_index, owner_index]).await?;
        Ok(())
    }
}

fn group_by_trip(comments: Vec<Comment>) -> HashMap<ObjectId, Vec<Comment>> {
    let mut grouped: HashMap<ObjectId, Vec<Comment>> = HashMap::new();
    for comment in comments {
        grouped.entry(comment.trip_id).or_default().push(comment);
    }
    grouped
}

#[async_trait]
impl Repository for CommentRepository {
    fn name(&self) -> &str {
        "comment_repository"
    }

    fn collection_name(&self) -> &str {
        COMMENTS_COLLECTION
    }

    async fn init(&self) -> AppResult<()> {
        self.create_indexes().await
    }
}

fn comment_repository_constructor() -> Arc<dyn Repository> {
    CommentRepository::instance()
}

inventory::submit! {
    RepositoryRegistration {
        name: "comment_repository",
        constructor: comment_repository_constructor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_by_trip_keeps_order() {
        let trip_a = ObjectId::new();
        let trip_b = ObjectId::new();
        let owner = ObjectId::new();
        let make = |trip: ObjectId, text: &str| {
            Comment::new(trip, owner, "noa".to_string(), text.to_string(), "d".to_string())
        };

        let grouped = group_by_trip(vec![make(trip_a, "1"), make(trip_b, "2"), make(trip_a, "3")]);

        let texts: Vec<&str> = grouped[&trip_a].iter().map(|c| c.comment.as_str()).collect();
        assert_eq!(texts, vec!["1", "3"]);
        assert_eq!(grouped[&trip_b].len(), 1);
    }
}
