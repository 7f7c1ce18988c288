use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// `likes` 컬렉션 문서. `(trip_id, owner)` 조합은 unique index로 보장됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Like {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub trip_id: ObjectId,

    /// 좋아요를 누른 사용자 ID
    pub owner: ObjectId,

    pub created_at: DateTime,
}

impl Like {
    pub fn new(trip_id: ObjectId, owner: ObjectId) -> Self {
        Self {
            id: None,
            trip_id,
            owner,
            created_at: DateTime::now(),
        }
    }
}
