use serde::{Deserialize, Serialize};

/// 좋아요 토글 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LikeAction {
    LikeAdded,
    LikeRemoved,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggleResponse {
    pub action: LikeAction,
    pub trip_id: String,
    pub num_of_likes: i32,
    pub is_liked_by_current_user: bool,
}

/// 좋아요 + 누른 사용자 정보
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeDetailResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub owner: String,
    pub user_name: Option<String>,
    pub img_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_action_wire_names() {
        assert_eq!(serde_json::to_string(&LikeAction::LikeAdded).unwrap(), "\"likeAdded\"");
        assert_eq!(serde_json::to_string(&LikeAction::LikeRemoved).unwrap(), "\"likeRemoved\"");
    }
}
