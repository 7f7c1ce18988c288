//! # 여행 서비스
//!
//! 여행 CRUD, 검색, 댓글, 좋아요 토글과 관련 실시간 이벤트 발행을 담당합니다.
//!
//! ## 조회자 관점
//!
//! 목록/단건 응답의 `isLikedByCurrentUser`, `isFavoritedByCurrentUser` 는
//! 선택 인증(`OptionalUser`)으로 들어온 조회자 기준으로 계산합니다.
//!
//! ## 슬러그
//!
//! `"{country}-{typeTrip}"` 을 slugify 한 값을 쓰고, 이미 있으면 `-1`, `-2`, ... 를 붙여 빈 값을 찾습니다.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use log::{debug, info};
use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};
use once_cell::sync::OnceCell;
use validator::Validate;

use crate::config::PaginationConfig;
use crate::core::errors::{AppError, AppResult};
use crate::core::registry::{Service, ServiceLocator, ServiceRegistration};
use crate::domain::dto::trips::request::{AddCommentRequest, CreateTripRequest, UpdateTripRequest};
use crate::domain::dto::trips::response::{
    sanitize_trips, CommentResponse, LikeAction, LikeDetailResponse, LikeToggleResponse,
    PaginatedTripsResponse, TripResponse, TripSearchResponse, ViewerContext,
};
use crate::domain::entities::trips::{Comment, Like, Trip};
use crate::domain::models::auth::AuthenticatedUser;
use crate::realtime::{DomainEvent, EventHub, EventName};
use crate::repositories::parse_object_id;
use crate::repositories::trips::trip_query::build_search_filter;
use crate::repositories::trips::{CommentRepository, LikeRepository, TripRepository};
use crate::repositories::users::UserRepository;
use crate::utils::string_utils::{slug_candidate, slugify, validate_required_string};

static TRIP_SERVICE_INSTANCE: OnceCell<Arc<TripService>> = OnceCell::new();

const FALLBACK_SLUG: &str = "trip";

pub struct TripService {
    hub: Arc<EventHub>,
    trip_repo: Arc<TripRepository>,
    comment_repo: Arc<CommentRepository>,
    like_repo: Arc<LikeRepository>,
    user_repo: Arc<UserRepository>,
}

impl TripService {
    pub fn instance() -> Arc<Self> {
        TRIP_SERVICE_INSTANCE
            .get_or_init(|| {
                Arc::new(Self {
                    hub: ServiceLocator::get::<EventHub>(),
                    trip_repo: TripRepository::instance(),
                    comment_repo: CommentRepository::instance(),
                    like_repo: LikeRepository::instance(),
                    user_repo: UserRepository::instance(),
                })
            })
            .clone()
    }

    // ---- slug ----

    /// `exclude` 는 수정 중인 여행 자신
    pub async fn generate_unique_slug(
        &self,
        country: &str,
        type_trip: &str,
        exclude: Option<&ObjectId>,
    ) -> AppResult<String> {
        let base = slug_base(country, type_trip);
        let mut counter = 0;

        loop {
            let candidate = slug_candidate(&base, counter);
            if !self.trip_repo.slug_exists(&candidate, exclude).await? {
                return Ok(candidate);
            }
            counter += 1;
        }
    }

    // ---- 조회 ----

    pub async fn get_all_trips(
        &self,
        page: Option<u64>,
        limit: Option<u64>,
        viewer: Option<&str>,
    ) -> AppResult<PaginatedTripsResponse> {
        let (page, limit) = PaginationConfig::normalize(page, limit);
        let (trips, total) = self.trip_repo.find_page(PaginationConfig::skip(page, limit), limit).await?;

        let data = self.summaries(&trips, viewer).await?;
        Ok(PaginatedTripsResponse::new(data, total, page, limit))
    }

    /// 검색엔진 봇용 HTML 렌더링에 쓰는 원본 목록
    pub async fn get_trip_page_entities(&self, page: Option<u64>, limit: Option<u64>) -> AppResult<Vec<Trip>> {
        let (page, limit) = PaginationConfig::normalize(page, limit);
        let (trips, _) = self.trip_repo.find_page(PaginationConfig::skip(page, limit), limit).await?;
        Ok(trips)
    }

    pub async fn get_trips_by_owner(&self, owner_id: &str, viewer: Option<&str>) -> AppResult<Vec<TripResponse>> {
        let owner_oid = parse_object_id(owner_id, "owner")?;
        let trips = self.trip_repo.find_by_owner(&owner_oid).await?;

        self.summaries(&trips, viewer).await
    }

    /// 결과가 비어 있어도 `Ok`. 404 응답 여부는 핸들러가 정합니다.
    pub async fn search_trips(
        &self,
        params: &HashMap<String, String>,
        viewer: Option<&str>,
    ) -> AppResult<TripSearchResponse> {
        let filter = build_search_filter(params)?;
        debug!("여행 검색 필터: {}", filter);

        let trips = self.trip_repo.search(filter).await?;
        Ok(TripSearchResponse {
            data: self.summaries(&trips, viewer).await?,
        })
    }

    pub async fn get_favorite_trips(&self, user_id: &str, viewer: Option<&str>) -> AppResult<Vec<TripResponse>> {
        let user_oid = parse_object_id(user_id, "user")?;
        let user = self
            .user_repo
            .find_by_id(&user_oid)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let ids: Vec<ObjectId> = user
            .favorite_trips
            .iter()
            .filter_map(|id| ObjectId::parse_str(id).ok())
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let trips = self.trip_repo.find_by_ids(&ids).await?;
        self.summaries(&trips, viewer.or(Some(user_id))).await
    }

    /// ID 또는 슬러그로 찾습니다.
    pub async fn find_trip(&self, id_or_slug: &str) -> AppResult<Trip> {
        let by_id = match ObjectId::parse_str(id_or_slug) {
            Ok(id) => self.trip_repo.find_by_id(&id).await?,
            Err(_) => None,
        };

        let trip = match by_id {
            Some(trip) => Some(trip),
            None => self.trip_repo.find_by_slug(id_or_slug).await?,
        };

        trip.ok_or_else(|| AppError::NotFound("Trip not found".to_string()))
    }

    pub async fn get_full_trip(&self, id_or_slug: &str, viewer: Option<&str>) -> AppResult<TripResponse> {
        let trip = self.find_trip(id_or_slug).await?;
        self.detailed(&trip, viewer).await
    }

    pub async fn get_likes_with_user_details(&self, trip_id: &str) -> AppResult<Vec<LikeDetailResponse>> {
        let trip = self.require_trip(trip_id).await?;
        let trip_oid = require_id(&trip)?;

        let likes = self.like_repo.find_by_trip(&trip_oid).await?;
        let owner_ids: Vec<ObjectId> = unique(likes.iter().map(|like| like.owner));
        let users: HashMap<ObjectId, (String, Option<String>)> = self
            .user_repo
            .find_many_by_ids(&owner_ids)
            .await?
            .into_iter()
            .filter_map(|user| user.id.map(|id| (id, (user.user_name, user.img_url))))
            .collect();

        Ok(likes
            .into_iter()
            .map(|like| {
                let (user_name, img_url) = users.get(&like.owner).cloned().unzip();
                LikeDetailResponse {
                    id: like.id.map(|id| id.to_hex()).unwrap_or_default(),
                    owner: like.owner.to_hex(),
                    user_name,
                    img_url: img_url.flatten(),
                }
            })
            .collect())
    }

    // ---- 변경 ----

    pub async fn add_trip(&self, auth: &AuthenticatedUser, request: CreateTripRequest) -> AppResult<TripResponse> {
        request.validate()?;
        let owner_id = auth.object_id()?;

        let owner = self
            .user_repo
            .find_by_id(&owner_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let slug = self
            .generate_unique_slug(&request.country, &request.type_trip, None)
            .await?;
        let now = DateTime::now();

        let trip = self
            .trip_repo
            .insert(Trip {
                id: None,
                owner_id,
                user_name: owner.user_name,
                img_url: owner.img_url,
                type_traveler: request.type_traveler,
                country: request.country,
                type_trip: request.type_trip,
                trip_photos: request.trip_photos,
                trip_description: request.trip_description,
                num_of_comments: 0,
                num_of_likes: 0,
                slug,
                created_at: now,
                updated_at: now,
            })
            .await?;

        info!("🧳 여행 생성: {} ({})", trip.slug, auth.user_id);

        let response = self.detailed(&trip, Some(&auth.user_id)).await?;
        self.hub.publish(DomainEvent::with_payload(EventName::TripCreated, &response));

        Ok(response)
    }

    pub async fn update_trip(
        &self,
        trip_id: &str,
        auth: &AuthenticatedUser,
        request: UpdateTripRequest,
    ) -> AppResult<TripResponse> {
        request.validate()?;
        if request.is_empty() {
            return Err(AppError::ValidationError("No fields to update".to_string()));
        }

        let trip = self.require_trip(trip_id).await?;
        let trip_oid = require_id(&trip)?;
        ensure_trip_owner(&trip, auth, "update")?;

        let mut fields = build_trip_update(&request);

        let country = request.country.as_deref().unwrap_or(&trip.country);
        let type_trip = request.type_trip.as_deref().unwrap_or(&trip.type_trip);
        if country != trip.country || type_trip != trip.type_trip {
            let slug = self.generate_unique_slug(country, type_trip, Some(&trip_oid)).await?;
            debug!("슬러그 변경: {} → {}", trip.slug, slug);
            fields.insert("slug", slug);
        }

        let updated = self
            .trip_repo
            .update_fields(&trip_oid, fields)
            .await?
            .ok_or_else(|| AppError::NotFound("Trip not found".to_string()))?;

        info!("✏️ 여행 수정: {}", updated.slug);

        let response = self.detailed(&updated, Some(&auth.user_id)).await?;
        self.hub.publish(DomainEvent::with_payload(EventName::TripUpdated, &response));

        Ok(response)
    }

    pub async fn delete_trip(&self, trip_id: &str, auth: &AuthenticatedUser) -> AppResult<()> {
        let trip = self.require_trip(trip_id).await?;
        let trip_oid = require_id(&trip)?;
        ensure_trip_owner(&trip, auth, "delete")?;

        let comments = self.comment_repo.delete_by_trip(&trip_oid).await?;
        let likes = self.like_repo.delete_by_trip(&trip_oid).await?;

        if !self.trip_repo.delete_by_id(&trip_oid).await? {
            return Err(AppError::NotFound("Trip not found".to_string()));
        }

        let trip_hex = trip_oid.to_hex();
        let favorites = self.user_repo.remove_trip_from_all_favorites(&trip_hex).await?;

        info!(
            "🗑️ 여행 삭제: {} (댓글 {}, 좋아요 {}, 즐겨찾기 {})",
            trip.slug, comments, likes, favorites
        );

        self.hub.publish(DomainEvent::trip_deleted(&trip_hex));
        Ok(())
    }

    /// 갱신된 댓글 목록을 반환합니다.
    pub async fn add_comment(
        &self,
        trip_id: &str,
        auth: &AuthenticatedUser,
        request: AddCommentRequest,
    ) -> AppResult<Vec<CommentResponse>> {
        request.validate()?;
        let trip = self.require_trip(trip_id).await?;
        let trip_oid = require_id(&trip)?;
        let user_id = auth.object_id()?;

        let payload = request.comment;
        let text = validate_required_string(&payload.comment, "comment")?;
        let owner_name = match payload.owner {
            Some(owner) => owner,
            None => self
                .user_repo
                .find_by_id(&user_id)
                .await?
                .map(|user| user.user_name)
                .ok_or_else(|| AppError::NotFound("User not found".to_string()))?,
        };
        let date = payload.date.unwrap_or_else(|| Utc::now().to_rfc3339());

        let comment = self
            .comment_repo
            .insert(Comment::new(trip_oid, user_id, owner_name, text, date))
            .await?;

        let comments = self.refresh_comments(&trip_oid).await?;

        let trip_hex = trip_oid.to_hex();
        let new_comment = comments
            .iter()
            .find(|c| Some(c.id.as_str()) == comment.id_string().as_deref())
            .cloned()
            .unwrap_or_else(|| CommentResponse::summary(&comment));
        self.hub.publish(DomainEvent::comment_added(&trip_hex, &new_comment));

        Ok(comments)
    }

    /// 댓글 작성자 또는 여행 작성자만 삭제할 수 있습니다.
    pub async fn delete_comment(
        &self,
        trip_id: &str,
        comment_id: &str,
        auth: &AuthenticatedUser,
    ) -> AppResult<Vec<CommentResponse>> {
        let trip = self.require_trip(trip_id).await?;
        let trip_oid = require_id(&trip)?;
        let comment_oid = parse_object_id(comment_id, "comment")?;
        let user_id = auth.object_id()?;

        let comment = comment_on_trip(self.comment_repo.find_by_id(&comment_oid).await?, &trip_oid)?;
        ensure_comment_deletable(&comment, &trip, &user_id)?;

        self.comment_repo.delete_by_id(&comment_oid).await?;
        let comments = self.refresh_comments(&trip_oid).await?;

        self.hub
            .publish(DomainEvent::comment_deleted(&trip_oid.to_hex(), &comment_oid.to_hex()));

        Ok(comments)
    }

    /// 누른 적 있으면 취소, 없으면 추가합니다.
    pub async fn toggle_like(&self, trip_id: &str, auth: &AuthenticatedUser) -> AppResult<LikeToggleResponse> {
        let trip = self.require_trip(trip_id).await?;
        let trip_oid = require_id(&trip)?;
        let user_id = auth.object_id()?;

        let existing = self.like_repo.find_one(&trip_oid, &user_id).await?;
        let outcome = match plan_like_toggle(existing) {
            LikeStep::Remove(like_id) => LikeOutcome::removed(self.like_repo.delete_by_id(&like_id).await?),
            LikeStep::Insert => LikeOutcome::from_insert(self.like_repo.insert(Like::new(trip_oid, user_id)).await)?,
        };
        if !outcome.changed {
            debug!("동시 좋아요 요청: {} / {}", trip_id, auth.user_id);
        }

        let count = self.like_repo.count_for_trip(&trip_oid).await?;
        let num_of_likes = self
            .trip_repo
            .set_like_count(&trip_oid, count)
            .await?
            .map(|trip| trip.num_of_likes)
            .unwrap_or_default();

        let trip_hex = trip_oid.to_hex();
        let action = outcome.action;
        if outcome.changed {
            let event = match action {
                LikeAction::LikeAdded => DomainEvent::like_added(&trip_hex, &auth.user_id),
                LikeAction::LikeRemoved => DomainEvent::like_removed(&trip_hex, &auth.user_id),
            };
            self.hub.publish(event);
        }

        Ok(LikeToggleResponse {
            action,
            trip_id: trip_hex,
            num_of_likes,
            is_liked_by_current_user: action == LikeAction::LikeAdded,
        })
    }

    // ---- 내부 ----

    async fn require_trip(&self, trip_id: &str) -> AppResult<Trip> {
        let trip_oid = parse_object_id(trip_id, "trip")?;
        self.trip_repo
            .find_by_id(&trip_oid)
            .await?
            .ok_or_else(|| AppError::NotFound("Trip not found".to_string()))
    }

    /// 댓글 수를 다시 세어 저장하고 상세 댓글 목록을 반환합니다.
    async fn refresh_comments(&self, trip_oid: &ObjectId) -> AppResult<Vec<CommentResponse>> {
        let count = self.comment_repo.count_for_trip(trip_oid).await?;
        self.trip_repo.set_comment_count(trip_oid, count).await?;

        let comments = self.comment_repo.find_by_trip(trip_oid).await?;
        let images = self.commenter_images(&comments).await?;

        Ok(comments
            .iter()
            .map(|comment| CommentResponse::detailed(comment, &images))
            .collect())
    }

    async fn commenter_images(&self, comments: &[Comment]) -> AppResult<HashMap<ObjectId, Option<String>>> {
        let ids = unique(comments.iter().map(|comment| comment.owner_id));

        Ok(self
            .user_repo
            .find_many_by_ids(&ids)
            .await?
            .into_iter()
            .filter_map(|user| user.id.map(|id| (id, user.img_url)))
            .collect())
    }

    async fn viewer_context(&self, viewer: Option<&str>, trips: &[Trip]) -> AppResult<ViewerContext> {
        let Some(viewer_oid) = viewer.and_then(|id| ObjectId::parse_str(id).ok()) else {
            return Ok(ViewerContext::anonymous());
        };

        let favorite_trip_ids: HashSet<String> = self
            .user_repo
            .find_by_id(&viewer_oid)
            .await?
            .map(|user| user.favorite_trips.into_iter().collect())
            .unwrap_or_default();

        let trip_ids: Vec<ObjectId> = trips.iter().filter_map(|trip| trip.id).collect();
        let liked_trip_ids = self.like_repo.liked_trip_ids(&viewer_oid, &trip_ids).await?;

        Ok(ViewerContext {
            user_id: Some(viewer_oid.to_hex()),
            favorite_trip_ids,
            liked_trip_ids,
        })
    }

    async fn summaries(&self, trips: &[Trip], viewer: Option<&str>) -> AppResult<Vec<TripResponse>> {
        let trip_ids: Vec<ObjectId> = trips.iter().filter_map(|trip| trip.id).collect();
        let comments = self.comment_repo.find_by_trips(&trip_ids).await?;
        let context = self.viewer_context(viewer, trips).await?;

        Ok(sanitize_trips(trips, &comments, &context))
    }

    async fn detailed(&self, trip: &Trip, viewer: Option<&str>) -> AppResult<TripResponse> {
        let trip_oid = require_id(trip)?;
        let comments = self.comment_repo.find_by_trip(&trip_oid).await?;
        let images = self.commenter_images(&comments).await?;
        let context = self.viewer_context(viewer, std::slice::from_ref(trip)).await?;

        Ok(TripResponse::detailed(trip, &comments, &context, &images))
    }
}

/// 좋아요 토글에서 실제로 할 일
#[derive(Debug, PartialEq)]
enum LikeStep {
    Remove(ObjectId),
    Insert,
}

fn plan_like_toggle(existing: Option<Like>) -> LikeStep {
    match existing.and_then(|like| like.id) {
        Some(like_id) => LikeStep::Remove(like_id),
        None => LikeStep::Insert,
    }
}

/// `changed == false` 면 동시 요청이 같은 변경을 먼저 반영했고 이벤트도 이미 나갔습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LikeOutcome {
    action: LikeAction,
    changed: bool,
}

impl LikeOutcome {
    fn removed(deleted: bool) -> Self {
        Self {
            action: LikeAction::LikeRemoved,
            changed: deleted,
        }
    }

    /// unique 인덱스 충돌은 이미 좋아요가 있는 상태로 봅니다.
    fn from_insert(result: AppResult<Like>) -> AppResult<Self> {
        match result {
            Ok(_) => Ok(Self {
                action: LikeAction::LikeAdded,
                changed: true,
            }),
            Err(AppError::ConflictError(_)) => Ok(Self {
                action: LikeAction::LikeAdded,
                changed: false,
            }),
            Err(e) => Err(e),
        }
    }
}

/// 다른 여행의 댓글 ID 로 지우려는 요청도 404.
fn comment_on_trip(comment: Option<Comment>, trip_id: &ObjectId) -> AppResult<Comment> {
    comment
        .filter(|comment| comment.trip_id == *trip_id)
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))
}

fn ensure_comment_deletable(comment: &Comment, trip: &Trip, caller: &ObjectId) -> AppResult<()> {
    if comment.owner_id == *caller || trip.is_owned_by(caller) {
        Ok(())
    } else {
        Err(AppError::AuthorizationError(
            "You are not authorized to delete this comment".to_string(),
        ))
    }
}

fn require_id(trip: &Trip) -> AppResult<ObjectId> {
    trip.id
        .ok_or_else(|| AppError::InternalError("Trip has no ObjectId".to_string()))
}

fn ensure_trip_owner(trip: &Trip, auth: &AuthenticatedUser, action: &str) -> AppResult<()> {
    if auth.is(&trip.owner_id.to_hex()) {
        Ok(())
    } else {
        Err(AppError::AuthorizationError(format!(
            "You are not authorized to {} this trip",
            action
        )))
    }
}

fn slug_base(country: &str, type_trip: &str) -> String {
    let base = slugify(&format!("{}-{}", country, type_trip));
    if base.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        base
    }
}

fn build_trip_update(request: &UpdateTripRequest) -> Document {
    let mut fields = doc! {};

    if let Some(type_traveler) = &request.type_traveler {
        fields.insert("type_traveler", type_traveler.as_str());
    }
    if let Some(country) = &request.country {
        fields.insert("country", country.as_str());
    }
    if let Some(type_trip) = &request.type_trip {
        fields.insert("type_trip", type_trip.as_str());
    }
    if let Some(description) = &request.trip_description {
        fields.insert("trip_description", description.clone());
    }
    if let Some(photos) = &request.trip_photos {
        fields.insert("trip_photos", photos.clone());
    }

    fields
}

/// 처음 나온 순서를 유지하며 중복 제거
fn unique(ids: impl Iterator<Item = ObjectId>) -> Vec<ObjectId> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}

impl Service for TripService {
    fn name(&self) -> &str {
        "trip_service"
    }
}

fn trip_service_constructor() -> Arc<dyn Service> {
    TripService::instance()
}

inventory::submit! {
    ServiceRegistration {
        name: "trip_service",
        constructor: trip_service_constructor,
    }
}
