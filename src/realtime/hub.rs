//! # 이벤트 허브
//!
//! `tokio::sync::broadcast` 채널 하나로 모든 WebSocket 세션에 이벤트를 뿌립니다.
//! 특정 사용자만 받아야 하는 이벤트는 `target` 을 달아 보내고, 세션 쪽에서 걸러냅니다.
//!
//! 느린 수신자는 `RecvError::Lagged` 를 받고 놓친 이벤트를 건너뜁니다.

use std::sync::Arc;

use log::debug;
use tokio::sync::broadcast;

use crate::realtime::events::DomainEvent;

pub const HUB_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub struct Envelope {
    /// `None` 이면 모든 세션
    pub target: Option<String>,
    pub event: DomainEvent,
}

impl Envelope {
    /// `user_id` 로 로그인한 세션이 받을 이벤트인지
    pub fn is_for(&self, user_id: Option<&str>) -> bool {
        match self.target.as_deref() {
            None => true,
            Some(target) => user_id == Some(target),
        }
    }
}

pub struct EventHub {
    sender: broadcast::Sender<Arc<Envelope>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::with_capacity(HUB_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// 전달된 세션 수를 반환합니다. 구독자가 없으면 0.
    pub fn publish(&self, event: DomainEvent) -> usize {
        self.send(Envelope { target: None, event })
    }

    pub fn publish_to_user(&self, user_id: &str, event: DomainEvent) -> usize {
        self.send(Envelope {
            target: Some(user_id.to_string()),
            event,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<Envelope>> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    fn send(&self, envelope: Envelope) -> usize {
        let name = envelope.event.event;
        match self.sender.send(Arc::new(envelope)) {
            Ok(receivers) => {
                debug!("📣 {:?} → {}개 세션", name, receivers);
                receivers
            }
            Err(_) => {
                debug!("📣 {:?}: 연결된 세션 없음", name);
                0
            }
        }
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realtime::events::EventName;
    use tokio::sync::broadcast::error::{RecvError, TryRecvError};

    #[test]
    fn test_publish_without_subscribers_is_not_an_error() {
        let hub = EventHub::new();
        assert_eq!(hub.publish(DomainEvent::trip_deleted("t1")), 0);
    }

    #[actix_web::test]
    async fn test_broadcast_reaches_every_subscriber() {
        let hub = EventHub::new();
        let mut first = hub.subscribe();
        let mut second = hub.subscribe();

        assert_eq!(hub.publish(DomainEvent::like_added("t1", "u1")), 2);

        assert_eq!(first.recv().await.unwrap().event.event, EventName::LikeAdded);
        assert_eq!(second.recv().await.unwrap().event.event, EventName::LikeAdded);
    }

    #[test]
    fn test_targeted_envelope_filtering() {
        let hub = EventHub::new();
        let mut receiver = hub.subscribe();
        hub.publish_to_user("u1", DomainEvent::disconnect_user());

        let envelope = receiver.try_recv().unwrap();
        assert!(envelope.is_for(Some("u1")));
        assert!(!envelope.is_for(Some("u2")));
        assert!(!envelope.is_for(None));
        assert!(matches!(receiver.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_untargeted_envelope_is_for_everyone() {
        let envelope = Envelope {
            target: None,
            event: DomainEvent::user_deleted("u1"),
        };
        assert!(envelope.is_for(None));
        assert!(envelope.is_for(Some("u9")));
    }

    #[actix_web::test]
    async fn test_slow_receiver_lags_and_recovers() {
        let hub = EventHub::with_capacity(2);
        let mut receiver = hub.subscribe();

        for i in 0..4 {
            hub.publish(DomainEvent::trip_deleted(&format!("t{}", i)));
        }

        assert!(matches!(receiver.recv().await, Err(RecvError::Lagged(2))));
        let next = receiver.recv().await.unwrap();
        assert_eq!(next.event.data["tripId"], "t2");
    }
}
