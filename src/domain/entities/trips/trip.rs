//! Trip Entity
//!
//! `trips` 컬렉션 문서입니다. 작성자의 표시 이름과 프로필 이미지는
//! 목록 조회 시 조인을 피하기 위해 여행 문서에 함께 저장합니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub owner_id: ObjectId,

    /// 작성자 표시 이름 (User.user_name 사본)
    pub user_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img_url: Option<String>,

    pub type_traveler: String,
    pub country: String,
    pub type_trip: String,

    #[serde(default)]
    pub trip_photos: Vec<String>,

    /// 하루에 한 항목
    #[serde(default)]
    pub trip_description: Vec<String>,

    #[serde(default)]
    pub num_of_comments: i32,

    #[serde(default)]
    pub num_of_likes: i32,

    /// URL용 고유 식별자 (unique index)
    pub slug: String,

    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Trip {
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    pub fn num_of_days(&self) -> usize {
        self.trip_description.len()
    }

    pub fn is_owned_by(&self, user_id: &ObjectId) -> bool {
        &self.owner_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_of_days_follows_description() {
        let owner_id = ObjectId::new();
        let trip = Trip {
            id: None,
            owner_id,
            user_name: "dana".to_string(),
            img_url: None,
            type_traveler: "family".to_string(),
            country: "Japan".to_string(),
            type_trip: "culture".to_string(),
            trip_photos: vec![],
            trip_description: vec!["Tokyo".to_string(), "Kyoto".to_string()],
            num_of_comments: 0,
            num_of_likes: 0,
            slug: "japan-culture".to_string(),
            created_at: DateTime::now(),
            updated_at: DateTime::now(),
        };

        assert_eq!(trip.num_of_days(), 2);
        assert!(trip.is_owned_by(&owner_id));
        assert!(!trip.is_owned_by(&ObjectId::new()));
    }
}
