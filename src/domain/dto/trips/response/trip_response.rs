//! # 여행 응답 매핑
//!
//! 저장된 `Trip` 과 댓글 목록을 조회자 관점의 응답으로 변환합니다.
//!
//! | 필드 | 목록(summary) | 단건(detailed) |
//! |------|---------------|----------------|
//! | `owner._id` | 없음 | 조회자가 작성자일 때만 |
//! | `comments[].ownerId` | 없음 | 있음 |
//! | `comments[].imgUrl` | 없음 | 댓글 작성자 프로필 이미지 (없으면 `""`) |
//!
//! `isLikedByCurrentUser` / `isFavoritedByCurrentUser` 는 비로그인 조회자에게 항상 `false` 입니다.

use std::collections::{HashMap, HashSet};

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::domain::entities::trips::{Comment, Trip};

/// 응답을 만드는 조회자 정보
#[derive(Debug, Clone, Default)]
pub struct ViewerContext {
    pub user_id: Option<String>,
    pub favorite_trip_ids: HashSet<String>,
    /// 조회 대상 여행 중 조회자가 좋아요를 누른 것
    pub liked_trip_ids: HashSet<String>,
}

impl ViewerContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    fn has_liked(&self, trip_id: &str) -> bool {
        self.user_id.is_some() && self.liked_trip_ids.contains(trip_id)
    }

    fn has_favorited(&self, trip_id: &str) -> bool {
        self.user_id.is_some() && self.favorite_trip_ids.contains(trip_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripOwnerResponse {
    pub user_name: String,
    pub img_url: Option<String>,
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub owner: String,
    pub comment: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img_url: Option<String>,
}

impl CommentResponse {
    pub fn summary(comment: &Comment) -> Self {
        Self {
            id: comment.id_string().unwrap_or_default(),
            owner: comment.owner.clone(),
            comment: comment.comment.clone(),
            date: comment.date.clone(),
            owner_id: None,
            img_url: None,
        }
    }

    pub fn detailed(comment: &Comment, commenter_images: &HashMap<ObjectId, Option<String>>) -> Self {
        let img_url = commenter_images
            .get(&comment.owner_id)
            .cloned()
            .flatten()
            .unwrap_or_default();

        Self {
            owner_id: Some(comment.owner_id.to_hex()),
            img_url: Some(img_url),
            ..Self::summary(comment)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub slug: String,
    pub type_traveler: String,
    pub country: String,
    pub type_trip: String,
    pub trip_description: Vec<String>,
    pub trip_photos: Vec<String>,
    pub num_of_comments: i32,
    pub num_of_likes: i32,
    pub num_of_days: usize,
    pub owner: TripOwnerResponse,
    pub comments: Vec<CommentResponse>,
    pub is_liked_by_current_user: bool,
    pub is_favorited_by_current_user: bool,
}

impl TripResponse {
    /// 목록용 매핑
    pub fn summary(trip: &Trip, comments: &[Comment], viewer: &ViewerContext) -> Self {
        let comments = comments.iter().map(CommentResponse::summary).collect();
        Self::build(trip, comments, viewer, false)
    }

    /// 단건 조회용 매핑
    pub fn detailed(
        trip: &Trip,
        comments: &[Comment],
        viewer: &ViewerContext,
        commenter_images: &HashMap<ObjectId, Option<String>>,
    ) -> Self {
        let comments = comments
            .iter()
            .map(|comment| CommentResponse::detailed(comment, commenter_images))
            .collect();
        Self::build(trip, comments, viewer, true)
    }

    fn build(trip: &Trip, comments: Vec<CommentResponse>, viewer: &ViewerContext, detailed: bool) -> Self {
        let id = trip.id_string().unwrap_or_default();
        let owner_hex = trip.owner_id.to_hex();
        let viewer_is_owner = viewer.user_id.as_deref() == Some(owner_hex.as_str());

        Self {
            slug: trip.slug.clone(),
            type_traveler: trip.type_traveler.clone(),
            country: trip.country.clone(),
            type_trip: trip.type_trip.clone(),
            trip_description: trip.trip_description.clone(),
            trip_photos: trip.trip_photos.clone(),
            num_of_comments: trip.num_of_comments,
            num_of_likes: trip.num_of_likes,
            num_of_days: trip.num_of_days(),
            owner: TripOwnerResponse {
                user_name: trip.user_name.clone(),
                img_url: trip.img_url.clone(),
                id: (detailed && viewer_is_owner).then_some(owner_hex),
            },
            comments,
            is_liked_by_current_user: viewer.has_liked(&id),
            is_favorited_by_current_user: viewer.has_favorited(&id),
            id,
        }
    }
}

/// 트립 ID별 댓글 묶음에서 목록 응답을 만듭니다.
pub fn sanitize_trips(
    trips: &[Trip],
    comments_by_trip: &HashMap<ObjectId, Vec<Comment>>,
    viewer: &ViewerContext,
) -> Vec<TripResponse> {
    trips
        .iter()
        .map(|trip| {
            let comments = trip
                .id
                .as_ref()
                .and_then(|id| comments_by_trip.get(id))
                .map(Vec::as_slice)
                .unwrap_or_default();
            TripResponse::summary(trip, comments, viewer)
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedTripsResponse {
    pub data: Vec<TripResponse>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl PaginatedTripsResponse {
    pub fn new(data: Vec<TripResponse>, total: u64, page: u64, limit: u64) -> Self {
        Self {
            data,
            total,
            page,
            limit,
            total_pages: total.div_ceil(limit.max(1)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripSearchResponse {
    pub data: Vec<TripResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::DateTime;

    fn trip_owned_by(owner_id: ObjectId) -> Trip {
        Trip {
            id: Some(ObjectId::new()),
            owner_id,
            user_name: "dana".to_string(),
            img_url: Some("https://img/dana.png".to_string()),
            type_traveler: "couple".to_string(),
            country: "Peru".to_string(),
            type_trip: "trek".to_string(),
            trip_photos: vec!["https://img/1.png".to_string()],
            trip_description: vec!["Lima".to_string(), "Cusco".to_string(), "Machu Picchu".to_string()],
            num_of_comments: 1,
            num_of_likes: 1,
            slug: "peru-trek".to_string(),
            created_at: DateTime::now(),
            updated_at: DateTime::now(),
        }
    }

    fn comment_on(trip: &Trip, owner_id: ObjectId) -> Comment {
        let mut comment = Comment::new(
            trip.id.unwrap(),
            owner_id,
            "Noa".to_string(),
            "Looks amazing".to_string(),
            "2024-05-01T10:00:00Z".to_string(),
        );
        comment.id = Some(ObjectId::new());
        comment
    }

    #[test]
    fn test_anonymous_viewer_flags_false() {
        let trip = trip_owned_by(ObjectId::new());
        let mut viewer = ViewerContext::anonymous();
        viewer.liked_trip_ids.insert(trip.id_string().unwrap());

        let response = TripResponse::summary(&trip, &[], &viewer);
        assert!(!response.is_liked_by_current_user);
        assert!(!response.is_favorited_by_current_user);
        assert_eq!(response.num_of_days, 3);
    }

    #[test]
    fn test_liked_and_favorited_flags() {
        let trip = trip_owned_by(ObjectId::new());
        let trip_id = trip.id_string().unwrap();
        let viewer = ViewerContext {
            user_id: Some(ObjectId::new().to_hex()),
            favorite_trip_ids: HashSet::from([trip_id.clone()]),
            liked_trip_ids: HashSet::from([trip_id]),
        };

        let response = TripResponse::summary(&trip, &[], &viewer);
        assert!(response.is_liked_by_current_user);
        assert!(response.is_favorited_by_current_user);
    }

    #[test]
    fn test_summary_hides_owner_id_and_comment_details() {
        let owner_id = ObjectId::new();
        let trip = trip_owned_by(owner_id);
        let comments = vec![comment_on(&trip, ObjectId::new())];
        let viewer = ViewerContext {
            user_id: Some(owner_id.to_hex()),
            ..Default::default()
        };

        let json = serde_json::to_value(TripResponse::summary(&trip, &comments, &viewer)).unwrap();
        assert!(json["owner"].get("_id").is_none());
        assert!(json["comments"][0].get("ownerId").is_none());
        assert!(json["comments"][0].get("imgUrl").is_none());
        assert_eq!(json["comments"][0]["comment"], "Looks amazing");
    }

    #[test]
    fn test_detailed_exposes_owner_id_only_to_owner() {
        let owner_id = ObjectId::new();
        let commenter_id = ObjectId::new();
        let trip = trip_owned_by(owner_id);
        let comments = vec![comment_on(&trip, commenter_id)];
        let images = HashMap::from([(commenter_id, Some("https://img/noa.png".to_string()))]);

        let as_owner = ViewerContext {
            user_id: Some(owner_id.to_hex()),
            ..Default::default()
        };
        let response = TripResponse::detailed(&trip, &comments, &as_owner, &images);
        assert_eq!(response.owner.id, Some(owner_id.to_hex()));
        assert_eq!(response.comments[0].owner_id, Some(commenter_id.to_hex()));
        assert_eq!(response.comments[0].img_url.as_deref(), Some("https://img/noa.png"));

        let as_stranger = ViewerContext {
            user_id: Some(ObjectId::new().to_hex()),
            ..Default::default()
        };
        let response = TripResponse::detailed(&trip, &comments, &as_stranger, &HashMap::new());
        assert!(response.owner.id.is_none());
        assert_eq!(response.comments[0].img_url.as_deref(), Some(""));
    }

    #[test]
    fn test_sanitize_trips_groups_comments() {
        let first = trip_owned_by(ObjectId::new());
        let second = trip_owned_by(ObjectId::new());
        let comment = comment_on(&first, ObjectId::new());
        let grouped = HashMap::from([(first.id.unwrap(), vec![comment])]);

        let responses = sanitize_trips(&[first, second], &grouped, &ViewerContext::anonymous());
        assert_eq!(responses[0].comments.len(), 1);
        assert!(responses[1].comments.is_empty());
    }

    #[test]
    fn test_paginated_total_pages() {
        assert_eq!(PaginatedTripsResponse::new(vec![], 0, 1, 10).total_pages, 0);
        assert_eq!(PaginatedTripsResponse::new(vec![], 10, 1, 10).total_pages, 1);
        assert_eq!(PaginatedTripsResponse::new(vec![], 11, 2, 10).total_pages, 2);
    }
}
