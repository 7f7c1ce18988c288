//! # 인증 서비스
//!
//! 회원가입, 로그인, Google 로그인, 로그아웃, 토큰 갱신을 담당합니다.
//!
//! ## 리프레시 토큰 회전
//!
//! 사용자 문서의 `refresh_tokens` 에는 발급 후 아직 쓰이지 않은 토큰의 해시만 남습니다.
//! 이미 회전된(목록에 없는) 토큰이 다시 들어오면 탈취로 보고 해당 사용자의
//! 모든 리프레시 토큰을 폐기합니다.

use std::sync::Arc;
use std::time::Instant;

use log::{debug, info, warn};
use mongodb::bson::oid::ObjectId;
use once_cell::sync::OnceCell;
use validator::Validate;

use crate::config::PasswordConfig;
use crate::core::errors::{AppError, AppResult, ErrorContext};
use crate::core::registry::{Service, ServiceRegistration};
use crate::domain::dto::users::request::{GoogleSignInRequest, LoginRequest, RegisterRequest};
use crate::domain::dto::users::response::AuthResponse;
use crate::domain::entities::users::user::User;
use crate::domain::models::token::TokenPair;
use crate::repositories::users::UserRepository;
use crate::services::auth::{GoogleAuthService, TokenService};

static AUTH_SERVICE_INSTANCE: OnceCell<Arc<AuthService>> = OnceCell::new();

const LOGIN_FAILED: &str = "Email or password incorrect";

/// 제시된 리프레시 토큰을 저장된 해시 목록과 대조한 결과
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum RefreshTokenCheck {
    /// 유효. 제시된 토큰을 뺀 나머지 목록
    Outstanding(Vec<String>),
    /// 이미 쓰였거나 폐기된 토큰
    Reused,
}

pub(crate) fn check_refresh_token(stored: &[String], presented_hash: &str) -> RefreshTokenCheck {
    if !stored.iter().any(|hash| hash == presented_hash) {
        return RefreshTokenCheck::Reused;
    }

    RefreshTokenCheck::Outstanding(
        stored
            .iter()
            .filter(|hash| hash.as_str() != presented_hash)
            .cloned()
            .collect(),
    )
}

pub struct AuthService {
    user_repo: Arc<UserRepository>,
    token_service: Arc<TokenService>,
    google_auth: Arc<GoogleAuthService>,
}

impl AuthService {
    pub fn instance() -> Arc<Self> {
        AUTH_SERVICE_INSTANCE
            .get_or_init(|| {
                Arc::new(Self {
                    user_repo: UserRepository::instance(),
                    token_service: TokenService::instance(),
                    google_auth: GoogleAuthService::instance(),
                })
            })
            .clone()
    }

    /// 이미 가입된 이메일이면 406 "email already exists".
    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        request.validate()?;

        if self.user_repo.find_by_email(&request.email).await?.is_some() {
            return Err(email_taken());
        }

        let start_time = Instant::now();
        let password_hash = bcrypt::hash(&request.password, PasswordConfig::bcrypt_cost())
            .context("Password hashing failed")?;
        debug!("Password hashing took: {:?}", start_time.elapsed());

        let user = User::new_local(
            request.email.clone(),
            request.resolved_user_name(),
            password_hash,
            request.img_url.clone(),
        );

        let created = self
            .user_repo
            .create(user)
            .await
            .map_err(registration_conflict)?;
        info!("👤 회원가입: {}", created.email);

        self.sign_in(created).await
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        request.validate()?;

        let user = self
            .user_repo
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::AuthenticationError(LOGIN_FAILED.to_string()))?;

        let password_hash = match user.password_hash.as_deref() {
            Some(hash) => hash,
            None => {
                debug!("비밀번호 없는 계정의 로그인 시도: {}", user.email);
                return Err(AppError::AuthenticationError(LOGIN_FAILED.to_string()));
            }
        };

        let is_valid = bcrypt::verify(&request.password, password_hash)
            .context("Password verification failed")?;
        if !is_valid {
            return Err(AppError::AuthenticationError(LOGIN_FAILED.to_string()));
        }

        info!("🔑 로그인: {}", user.email);
        self.sign_in(user).await
    }

    /// 처음 보는 Google 계정은 비밀번호 없는 사용자로 만듭니다.
    pub async fn google_sign_in(&self, request: GoogleSignInRequest) -> AppResult<AuthResponse> {
        request.validate()?;

        let info = self.google_auth.verify_id_token(&request.credential).await?;
        let email = info
            .email
            .clone()
            .ok_or_else(|| AppError::AuthenticationError("Google account has no email".to_string()))?;

        let user = match self.user_repo.find_by_email(&email).await? {
            Some(existing) => existing,
            None => {
                let user = User::new_google(email, info.display_name(), info.picture.clone());
                let created = self.user_repo.create(user).await?;
                info!("👤 Google 계정으로 가입: {}", created.email);
                created
            }
        };

        self.sign_in(user).await
    }

    /// 제시된 리프레시 토큰을 폐기합니다.
    pub async fn logout(&self, refresh_token: &str) -> AppResult<()> {
        let (user_id, user) = self.resolve_refresh_owner(refresh_token).await?;
        let presented = TokenService::hash_token(refresh_token);

        match check_refresh_token(&user.refresh_tokens, &presented) {
            RefreshTokenCheck::Outstanding(remaining) => {
                self.user_repo.replace_refresh_tokens(&user_id, remaining).await?;
                info!("👋 로그아웃: {}", user.email);
                Ok(())
            }
            RefreshTokenCheck::Reused => {
                warn!("⚠️ 등록되지 않은 리프레시 토큰으로 로그아웃 시도, 전체 폐기: {}", user.email);
                self.user_repo.replace_refresh_tokens(&user_id, Vec::new()).await?;
                Err(AppError::AuthenticationError("Token not found".to_string()))
            }
        }
    }

    /// 리프레시 토큰을 회전하고 새 토큰 쌍을 반환합니다.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair> {
        let (user_id, user) = self.resolve_refresh_owner(refresh_token).await?;
        let presented = TokenService::hash_token(refresh_token);

        match check_refresh_token(&user.refresh_tokens, &presented) {
            RefreshTokenCheck::Outstanding(mut remaining) => {
                let tokens = self.token_service.generate_token_pair(&user_id.to_hex())?;
                remaining.push(TokenService::hash_token(&tokens.refresh_token));

                self.user_repo.replace_refresh_tokens(&user_id, remaining).await?;
                debug!("리프레시 토큰 회전: {}", user_id);
                Ok(tokens)
            }
            RefreshTokenCheck::Reused => {
                warn!("⚠️ 리프레시 토큰 재사용 감지, 전체 폐기: {}", user.email);
                self.user_repo.replace_refresh_tokens(&user_id, Vec::new()).await?;
                Err(AppError::AuthorizationError("Invalid refresh token".to_string()))
            }
        }
    }

    /// 서명 검증 실패는 403, 사용자가 없으면 404.
    async fn resolve_refresh_owner(&self, refresh_token: &str) -> AppResult<(ObjectId, User)> {
        let claims = self.token_service.verify_refresh_token(refresh_token).map_err(|e| {
            debug!("리프레시 토큰 검증 실패: {}", e);
            AppError::AuthorizationError("Invalid refresh token".to_string())
        })?;

        let user_id = ObjectId::parse_str(&claims.user_id)
            .map_err(|_| AppError::AuthorizationError("Invalid refresh token".to_string()))?;

        let user = self
            .user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok((user_id, user))
    }

    async fn sign_in(&self, user: User) -> AppResult<AuthResponse> {
        let user_id = user
            .id
            .ok_or_else(|| AppError::InternalError("User has no ObjectId".to_string()))?;

        let tokens = self.token_service.generate_token_pair(&user_id.to_hex())?;
        self.user_repo
            .push_refresh_token(&user_id, &TokenService::hash_token(&tokens.refresh_token))
            .await?;

        Ok(AuthResponse::new(&user, tokens))
    }
}

impl Service for AuthService {
    fn name(&self) -> &str {
        "auth_service"
    }
}

fn auth_service_constructor() -> Arc<dyn Service> {
    AuthService::instance()
}

inventory::submit! {
    ServiceRegistration {
        name: "auth_service",
        constructor: auth_service_constructor,
    }
}

fn email_taken() -> AppError {
    AppError::NotAcceptable("email already exists".to_string())
}

/// 동시 가입으로 unique 인덱스에 걸린 경우도 같은 406 으로 응답합니다.
fn registration_conflict(error: AppError) -> AppError {
    match error {
        AppError::ConflictError(_) => email_taken(),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    fn hashes(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_outstanding_token_is_removed() {
        let stored = hashes(&["a", "b", "c"]);
        assert_eq!(
            check_refresh_token(&stored, "b"),
            RefreshTokenCheck::Outstanding(hashes(&["a", "c"]))
        );
    }

    #[test]
    fn test_unknown_token_is_reuse() {
        let stored = hashes(&["a", "c"]);
        assert_eq!(check_refresh_token(&stored, "b"), RefreshTokenCheck::Reused);
        assert_eq!(check_refresh_token(&[], "b"), RefreshTokenCheck::Reused);
    }

    #[test]
    fn test_rotated_token_cannot_be_replayed() {
        let first = TokenService::hash_token("first-refresh");
        let second = TokenService::hash_token("second-refresh");

        let mut stored = match check_refresh_token(&[first.clone()], &first) {
            RefreshTokenCheck::Outstanding(remaining) => remaining,
            RefreshTokenCheck::Reused => panic!("fresh token treated as reuse"),
        };
        stored.push(second.clone());

        assert_eq!(check_refresh_token(&stored, &first), RefreshTokenCheck::Reused);
        assert_eq!(
            check_refresh_token(&stored, &second),
            RefreshTokenCheck::Outstanding(Vec::new())
        );
    }

    #[test]
    fn test_duplicate_email_on_register_is_not_acceptable() {
        let error = registration_conflict(AppError::ConflictError("Email already exists".to_string()));
        assert!(matches!(error, AppError::NotAcceptable(ref msg) if msg == "email already exists"));
        assert_eq!(error.status(), StatusCode::NOT_ACCEPTABLE);
    }

    #[test]
    fn test_other_register_errors_pass_through() {
        let error = registration_conflict(AppError::DatabaseError("down".to_string()));
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
