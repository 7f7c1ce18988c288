//! # 실시간 이벤트
//!
//! 모든 프레임은 `{"event": "<이름>", "data": ...}` 형태의 JSON 텍스트입니다.
//!
//! | 이벤트 | data | 발생 |
//! |--------|------|------|
//! | `likeAdded` / `likeRemoved` | `{tripId, userId}` | 좋아요 토글 |
//! | `commentAdded` | `{tripId, newComment}` | 댓글 작성 |
//! | `commentDeleted` | `{tripId, commentId}` | 댓글 삭제 |
//! | `tripCreated` / `tripUpdated` | 여행 응답 | 여행 생성/수정 |
//! | `tripDeleted` | `{tripId}` | 여행 삭제 |
//! | `imageAdded` | 클라이언트가 보낸 값 | 클라이언트 relay |
//! | `userDeleted` | `{userId}` | 계정 삭제 |
//! | `disconnectUser` | `null` | 삭제된 사용자의 소켓에만 |

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventName {
    LikeAdded,
    LikeRemoved,
    CommentAdded,
    CommentDeleted,
    TripCreated,
    TripUpdated,
    TripDeleted,
    ImageAdded,
    UserDeleted,
    DisconnectUser,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainEvent {
    pub event: EventName,
    #[serde(default)]
    pub data: Value,
}

impl DomainEvent {
    pub fn new(event: EventName, data: Value) -> Self {
        Self { event, data }
    }

    /// 직렬화에 실패하면 `data` 를 `null` 로 보냅니다.
    pub fn with_payload<T: Serialize>(event: EventName, payload: &T) -> Self {
        let data = serde_json::to_value(payload).unwrap_or_else(|e| {
            warn!("⚠️ {:?} 이벤트 payload 직렬화 실패: {}", event, e);
            Value::Null
        });
        Self::new(event, data)
    }

    pub fn like_added(trip_id: &str, user_id: &str) -> Self {
        Self::new(EventName::LikeAdded, json!({ "tripId": trip_id, "userId": user_id }))
    }

    pub fn like_removed(trip_id: &str, user_id: &str) -> Self {
        Self::new(EventName::LikeRemoved, json!({ "tripId": trip_id, "userId": user_id }))
    }

    pub fn comment_added<T: Serialize>(trip_id: &str, new_comment: &T) -> Self {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Payload<'a, T> {
            trip_id: &'a str,
            new_comment: &'a T,
        }

        Self::with_payload(EventName::CommentAdded, &Payload { trip_id, new_comment })
    }

    pub fn comment_deleted(trip_id: &str, comment_id: &str) -> Self {
        Self::new(EventName::CommentDeleted, json!({ "tripId": trip_id, "commentId": comment_id }))
    }

    pub fn trip_deleted(trip_id: &str) -> Self {
        Self::new(EventName::TripDeleted, json!({ "tripId": trip_id }))
    }

    pub fn user_deleted(user_id: &str) -> Self {
        Self::new(EventName::UserDeleted, json!({ "userId": user_id }))
    }

    pub fn disconnect_user() -> Self {
        Self::new(EventName::DisconnectUser, Value::Null)
    }

    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// 클라이언트가 보내는 프레임
#[derive(Debug, Clone, Deserialize)]
pub struct ClientMessage {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

impl ClientMessage {
    /// 모든 클라이언트에게 다시 뿌릴 이벤트. 모르는 이름이면 `None`.
    pub fn into_relay(self) -> Option<DomainEvent> {
        let name = match self.event.as_str() {
            "updateTrip" => EventName::TripUpdated,
            "addImage" => EventName::ImageAdded,
            "addLike" => EventName::LikeAdded,
            "addComment" => EventName::CommentAdded,
            _ => return None,
        };

        Some(DomainEvent::new(name, self.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_frame_shape() {
        let frame = DomainEvent::like_added("t1", "u1").to_frame().unwrap();
        let value: Value = serde_json::from_str(&frame).unwrap();

        assert_eq!(value["event"], "likeAdded");
        assert_eq!(value["data"]["tripId"], "t1");
        assert_eq!(value["data"]["userId"], "u1");
    }

    #[test]
    fn test_event_names_are_camel_case() {
        let names = [
            (EventName::CommentDeleted, "commentDeleted"),
            (EventName::TripCreated, "tripCreated"),
            (EventName::UserDeleted, "userDeleted"),
            (EventName::DisconnectUser, "disconnectUser"),
        ];

        for (name, expected) in names {
            assert_eq!(serde_json::to_value(name).unwrap(), Value::String(expected.to_string()));
        }
    }

    #[test]
    fn test_comment_added_wraps_payload() {
        let event = DomainEvent::comment_added("t1", &json!({ "comment": "hi" }));
        assert_eq!(event.data["newComment"]["comment"], "hi");
    }

    #[test]
    fn test_disconnect_has_null_data() {
        let frame = DomainEvent::disconnect_user().to_frame().unwrap();
        assert_eq!(frame, r#"{"event":"disconnectUser","data":null}"#);
    }

    #[test]
    fn test_client_relay_mapping() {
        let relay = |event: &str| {
            ClientMessage {
                event: event.to_string(),
                data: json!({ "x": 1 }),
            }
            .into_relay()
            .map(|e| e.event)
        };

        assert_eq!(relay("updateTrip"), Some(EventName::TripUpdated));
        assert_eq!(relay("addImage"), Some(EventName::ImageAdded));
        assert_eq!(relay("addLike"), Some(EventName::LikeAdded));
        assert_eq!(relay("addComment"), Some(EventName::CommentAdded));
        assert_eq!(relay("deleteEverything"), None);
    }

    #[test]
    fn test_client_message_data_defaults_to_null() {
        let message: ClientMessage = serde_json::from_str(r#"{"event": "addLike"}"#).unwrap();
        let relayed = message.into_relay().unwrap();
        assert_eq!(relayed.data, Value::Null);
    }
}
