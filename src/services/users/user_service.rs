//! # 사용자 서비스
//!
//! 프로필 조회/수정/삭제, 비밀번호 확인, 즐겨찾기를 담당합니다.
//! 수정/삭제/비밀번호 확인은 본인만 가능합니다 (403).
//!
//! ## 계정 삭제
//!
//! 하나의 MongoDB 트랜잭션 안에서 다음을 처리합니다.
//!
//! 1. 사용자가 남긴 좋아요와 댓글 삭제
//! 2. 사용자가 작성한 여행과 그 여행의 좋아요/댓글 삭제
//! 3. 삭제된 여행을 다른 사용자의 즐겨찾기에서 제거
//! 4. 사용자가 좋아요/댓글을 남겼던 다른 여행의 카운터 재계산
//! 5. 사용자 문서 삭제
//!
//! 커밋 후 캐시를 지우고 `userDeleted` 를 전체에, `disconnectUser` 를 해당 사용자 소켓에 보냅니다.

use std::collections::HashSet;
use std::sync::Arc;

use log::{info, warn};
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::ClientSession;
use once_cell::sync::OnceCell;
use validator::Validate;

use crate::config::PasswordConfig;
use crate::core::errors::{AppError, AppResult, ErrorContext};
use crate::core::registry::{Service, ServiceLocator, ServiceRegistration};
use crate::db::Database;
use crate::domain::dto::users::request::{UpdateUserRequest, VerifyPasswordRequest};
use crate::domain::dto::users::response::{FavoritesResponse, PasswordCheckResponse, UserResponse};
use crate::domain::models::auth::AuthenticatedUser;
use crate::realtime::{DomainEvent, EventHub};
use crate::repositories::parse_object_id;
use crate::repositories::trips::{CommentRepository, LikeRepository, TripRepository};
use crate::repositories::users::UserRepository;

static USER_SERVICE_INSTANCE: OnceCell<Arc<UserService>> = OnceCell::new();

pub struct UserService {
    database: Arc<Database>,
    hub: Arc<EventHub>,
    user_repo: Arc<UserRepository>,
    trip_repo: Arc<TripRepository>,
    comment_repo: Arc<CommentRepository>,
    like_repo: Arc<LikeRepository>,
}

/// 사용자 삭제 시 함께 정리할 범위
#[derive(Debug, PartialEq)]
struct CascadePlan {
    /// 통째로 지울 사용자의 여행
    owned_trips: Vec<ObjectId>,
    /// 다른 사용자 즐겨찾기에서 뺄 값 (hex)
    favorite_keys: Vec<String>,
    /// 좋아요/댓글 수를 다시 셀 남의 여행
    recount: Vec<ObjectId>,
}

impl CascadePlan {
    fn new(owned_trips: Vec<ObjectId>, liked: &[ObjectId], commented: &[ObjectId]) -> Self {
        let favorite_keys = owned_trips.iter().map(|id| id.to_hex()).collect();
        let recount = recount_targets(liked, commented, &owned_trips);

        Self {
            owned_trips,
            favorite_keys,
            recount,
        }
    }
}

/// 트랜잭션 커밋 후 처리할 정보
struct CascadeOutcome {
    deleted_trips: usize,
    affected_users: Vec<ObjectId>,
}

impl UserService {
    pub fn instance() -> Arc<Self> {
        USER_SERVICE_INSTANCE
            .get_or_init(|| {
                Arc::new(Self {
                    database: ServiceLocator::get::<Database>(),
                    hub: ServiceLocator::get::<EventHub>(),
                    user_repo: UserRepository::instance(),
                    trip_repo: TripRepository::instance(),
                    comment_repo: CommentRepository::instance(),
                    like_repo: LikeRepository::instance(),
                })
            })
            .clone()
    }

    pub async fn get_user(&self, id: &str) -> AppResult<UserResponse> {
        let user_id = parse_object_id(id, "user")?;

        let user = self
            .user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(UserResponse::from(user))
    }

    pub async fn update_user(
        &self,
        id: &str,
        auth: &AuthenticatedUser,
        request: UpdateUserRequest,
    ) -> AppResult<UserResponse> {
        ensure_self(auth, id)?;
        request.validate()?;
        if request.is_empty() {
            return Err(AppError::ValidationError("No fields to update".to_string()));
        }

        let user_id = parse_object_id(id, "user")?;

        let password_hash = match request.password.as_deref() {
            Some(password) => Some(
                bcrypt::hash(password, PasswordConfig::bcrypt_cost())
                    .context("Password hashing failed")?,
            ),
            None => None,
        };
        let profile_changed = request.user_name.is_some() || request.img_url.is_some();

        let updated = self
            .user_repo
            .update_fields(&user_id, build_profile_update(&request, password_hash))
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if profile_changed {
            let touched = self
                .trip_repo
                .update_owner_display(&user_id, &updated.user_name, updated.img_url.as_deref())
                .await?;
            info!("✏️ 프로필 변경을 여행 {}개에 반영: {}", touched, id);
        }

        Ok(UserResponse::from(updated))
    }

    pub async fn delete_user(&self, id: &str, auth: &AuthenticatedUser) -> AppResult<()> {
        ensure_self(auth, id)?;
        let user_id = parse_object_id(id, "user")?;

        if self.user_repo.find_by_id(&user_id).await?.is_none() {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        let mut session = self.database.begin_transaction().await?;

        let outcome = match self.delete_cascade(&mut session, &user_id).await {
            Ok(outcome) => outcome,
            Err(e) => {
                if let Err(abort_error) = session.abort_transaction().await {
                    warn!("⚠️ 트랜잭션 롤백 실패: {}", abort_error);
                }
                return Err(e);
            }
        };

        session.commit_transaction().await?;

        self.user_repo.invalidate_cache(&user_id).await;
        self.user_repo.invalidate_many(&outcome.affected_users).await;

        info!(
            "🗑️ 사용자 삭제: {} (여행 {}개, 즐겨찾기 영향 사용자 {}명)",
            id,
            outcome.deleted_trips,
            outcome.affected_users.len()
        );

        self.hub.publish(DomainEvent::user_deleted(id));
        self.hub.publish_to_user(id, DomainEvent::disconnect_user());

        Ok(())
    }

    async fn delete_cascade(&self, session: &mut ClientSession, user_id: &ObjectId) -> AppResult<CascadeOutcome> {
        let owned_trips = self.trip_repo.owned_ids_in(session, user_id).await?;
        let liked_trips = self.like_repo.liked_trip_ids_in(session, user_id).await?;
        let commented_trips = self.comment_repo.commented_trip_ids_in(session, user_id).await?;
        let plan = CascadePlan::new(owned_trips, &liked_trips, &commented_trips);

        self.like_repo.delete_by_owner_in(session, user_id).await?;
        self.comment_repo.delete_by_owner_in(session, user_id).await?;

        self.like_repo.delete_by_trips_in(session, &plan.owned_trips).await?;
        self.comment_repo.delete_by_trips_in(session, &plan.owned_trips).await?;
        self.trip_repo.delete_by_owner_in(session, user_id).await?;

        let affected_users = self
            .user_repo
            .remove_trips_from_all_favorites_in(session, &plan.favorite_keys)
            .await?;

        for trip_id in &plan.recount {
            let likes = self.like_repo.count_for_trip_in(session, trip_id).await?;
            let comments = self.comment_repo.count_for_trip_in(session, trip_id).await?;
            self.trip_repo.set_counts_in(session, trip_id, likes, comments).await?;
        }

        if !self.user_repo.delete_in(session, user_id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        Ok(CascadeOutcome {
            deleted_trips: plan.owned_trips.len(),
            affected_users,
        })
    }

    /// 비밀번호가 없는 계정(Google)은 항상 `false`.
    pub async fn verify_password(
        &self,
        id: &str,
        auth: &AuthenticatedUser,
        request: VerifyPasswordRequest,
    ) -> AppResult<PasswordCheckResponse> {
        ensure_self(auth, id)?;
        request.validate()?;
        let user_id = parse_object_id(id, "user")?;

        let user = self
            .user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let is_valid = match user.password_hash.as_deref() {
            Some(hash) => bcrypt::verify(&request.current_password, hash)
                .context("Password verification failed")?,
            None => false,
        };

        Ok(PasswordCheckResponse { is_valid })
    }

    pub async fn add_favorite_trip(&self, auth: &AuthenticatedUser, trip_id: &str) -> AppResult<FavoritesResponse> {
        let user_id = auth.object_id()?;
        let trip_oid = parse_object_id(trip_id, "trip")?;

        if self.trip_repo.find_by_id(&trip_oid).await?.is_none() {
            return Err(AppError::NotFound("Trip not found".to_string()));
        }

        let user = self.user_repo.add_favorite(&user_id, &trip_oid.to_hex()).await?;

        Ok(FavoritesResponse {
            message: "Trip added to favorites".to_string(),
            favorite_trips: user.favorite_trips,
        })
    }

    pub async fn remove_favorite_trip(&self, auth: &AuthenticatedUser, trip_id: &str) -> AppResult<FavoritesResponse> {
        let user_id = auth.object_id()?;

        let user = self
            .user_repo
            .remove_favorite(&user_id, trip_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(FavoritesResponse {
            message: "Trip removed from favorites".to_string(),
            favorite_trips: user.favorite_trips,
        })
    }

    pub async fn get_favorite_trip_ids(&self, user_id: &str) -> AppResult<Vec<String>> {
        let user_oid = parse_object_id(user_id, "user")?;

        let user = self
            .user_repo
            .find_by_id(&user_oid)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(user.favorite_trips)
    }
}

fn ensure_self(auth: &AuthenticatedUser, target_id: &str) -> AppResult<()> {
    if auth.is(target_id) {
        Ok(())
    } else {
        Err(AppError::AuthorizationError(
            "You can only modify your own account".to_string(),
        ))
    }
}

fn build_profile_update(request: &UpdateUserRequest, password_hash: Option<String>) -> Document {
    let mut fields = doc! {};

    if let Some(email) = &request.email {
        fields.insert("email", email.as_str());
    }
    if let Some(user_name) = &request.user_name {
        fields.insert("user_name", user_name.as_str());
    }
    if let Some(img_url) = &request.img_url {
        fields.insert("img_url", Bson::String(img_url.clone()));
    }
    if let Some(hash) = password_hash {
        fields.insert("password_hash", hash);
    }

    fields
}

/// 좋아요/댓글만 남겼던(직접 작성하지 않은) 여행. 중복 없이 처음 나온 순서대로.
fn recount_targets(liked: &[ObjectId], commented: &[ObjectId], owned: &[ObjectId]) -> Vec<ObjectId> {
    let owned: HashSet<&ObjectId> = owned.iter().collect();
    let mut seen = HashSet::new();

    liked
        .iter()
        .chain(commented)
        .filter(|id| !owned.contains(id))
        .filter(|id| seen.insert(**id))
        .copied()
        .collect()
}

impl Service for UserService {
    fn name(&self) -> &str {
        "user_service"
    }
}

fn user_service_constructor() -> Arc<dyn Service> {
    UserService::instance()
}

inventory::submit! {
    ServiceRegistration {
        name: "user_service",
        constructor: user_service_constructor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_self() {
        let auth = AuthenticatedUser::new("64b000000000000000000001");
        assert!(ensure_self(&auth, "64b000000000000000000001").is_ok());
        assert!(matches!(
            ensure_self(&auth, "64b000000000000000000002"),
            Err(AppError::AuthorizationError(_))
        ));
    }

    #[test]
    fn test_profile_update_only_sets_sent_fields() {
        let request = UpdateUserRequest {
            user_name: Some("Noa".to_string()),
            ..Default::default()
        };

        let fields = build_profile_update(&request, None);
        assert_eq!(fields.get_str("user_name").unwrap(), "Noa");
        assert!(!fields.contains_key("email"));
        assert!(!fields.contains_key("img_url"));
        assert!(!fields.contains_key("password_hash"));
    }

    #[test]
    fn test_profile_update_stores_hash_not_password() {
        let request = UpdateUserRequest {
            password: Some("plain".to_string()),
            ..Default::default()
        };

        let fields = build_profile_update(&request, Some("$2b$hash".to_string()));
        assert_eq!(fields.get_str("password_hash").unwrap(), "$2b$hash");
        assert!(!fields.contains_key("password"));
    }

    #[test]
    fn test_recount_targets_excludes_owned_and_duplicates() {
        let own = ObjectId::new();
        let a = ObjectId::new();
        let b = ObjectId::new();

        let targets = recount_targets(&[a, own, b], &[b, a, own], &[own]);
        assert_eq!(targets, vec![a, b]);
    }

    #[test]
    fn test_recount_targets_empty() {
        assert!(recount_targets(&[], &[], &[ObjectId::new()]).is_empty());
    }

    #[test]
    fn test_cascade_plan_strips_owned_trips_from_favorites() {
        let own_first = ObjectId::new();
        let own_second = ObjectId::new();
        let other = ObjectId::new();

        let plan = CascadePlan::new(vec![own_first, own_second], &[other, own_first], &[other]);

        assert_eq!(plan.owned_trips, vec![own_first, own_second]);
        assert_eq!(plan.favorite_keys, vec![own_first.to_hex(), own_second.to_hex()]);
        assert_eq!(plan.recount, vec![other]);
    }

    #[test]
    fn test_cascade_plan_for_user_without_activity() {
        let plan = CascadePlan::new(Vec::new(), &[], &[]);
        assert!(plan.owned_trips.is_empty());
        assert!(plan.favorite_keys.is_empty());
        assert!(plan.recount.is_empty());
    }
}
