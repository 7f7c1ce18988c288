use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::string_utils::deserialize_optional_string;

/// `POST /trips/{tripId}/comments` 본문: `{"comment": {...}}`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddCommentRequest {
    #[validate(nested)]
    pub comment: CommentPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CommentPayload {
    /// 표시 이름. 없으면 작성자의 userName 을 사용합니다.
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub owner: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, max = 2000, message = "Comment must be 1-2000 characters"))]
    pub comment: String,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_comment_validation() {
        let request: AddCommentRequest =
            serde_json::from_str(r#"{"comment": {"owner": "Noa", "comment": ""}}"#).unwrap();
        assert!(request.validate().is_err());

        let request: AddCommentRequest =
            serde_json::from_str(r#"{"comment": {"comment": "Beautiful!"}}"#).unwrap();
        assert!(request.validate().is_ok());
        assert!(request.comment.owner.is_none());
    }
}
