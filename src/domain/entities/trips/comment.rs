use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// `comments` 컬렉션 문서
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub trip_id: ObjectId,

    pub owner_id: ObjectId,

    /// 작성 시점의 표시 이름
    pub owner: String,

    pub comment: String,

    /// 클라이언트가 보낸 작성 시각 문자열 (없으면 서버 시각)
    pub date: String,

    pub created_at: DateTime,
}

impl Comment {
    pub fn new(trip_id: ObjectId, owner_id: ObjectId, owner: String, comment: String, date: String) -> Self {
        Self {
            id: None,
            trip_id,
            owner_id,
            owner,
            comment,
            date,
            created_at: DateTime::now(),
        }
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }
}
