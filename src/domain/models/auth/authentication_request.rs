/// 라우트 스코프별 인증 강도
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// 유효한 액세스 토큰이 없으면 401
    Required,
    /// 토큰이 없거나 틀려도 익명 요청으로 통과
    Optional,
}
