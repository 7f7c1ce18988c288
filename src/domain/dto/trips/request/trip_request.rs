//! 여행 생성/수정/목록 요청 DTO

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::string_utils::{deserialize_trimmed_option, deserialize_trimmed_string};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTripRequest {
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    #[validate(length(min = 1, message = "typeTraveler is required"))]
    pub type_traveler: String,

    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    #[validate(length(min = 1, message = "country is required"))]
    pub country: String,

    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    #[validate(length(min = 1, message = "typeTrip is required"))]
    pub type_trip: String,

    /// 하루에 한 항목, 최소 하루
    #[serde(default)]
    #[validate(length(min = 1, message = "tripDescription must contain at least one day"))]
    pub trip_description: Vec<String>,

    #[serde(default)]
    pub trip_photos: Vec<String>,
}

/// 부분 수정. 보낸 필드만 덮어쓰고, 보낸 문자열 필드는 비어 있으면 안 됩니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTripRequest {
    #[serde(default, deserialize_with = "deserialize_trimmed_option")]
    #[validate(length(min = 1, message = "typeTraveler must not be blank"))]
    pub type_traveler: Option<String>,

    #[serde(default, deserialize_with = "deserialize_trimmed_option")]
    #[validate(length(min = 1, message = "country must not be blank"))]
    pub country: Option<String>,

    #[serde(default, deserialize_with = "deserialize_trimmed_option")]
    #[validate(length(min = 1, message = "typeTrip must not be blank"))]
    pub type_trip: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, message = "tripDescription must contain at least one day"))]
    pub trip_description: Option<Vec<String>>,

    #[serde(default)]
    pub trip_photos: Option<Vec<String>>,
}

impl UpdateTripRequest {
    pub fn is_empty(&self) -> bool {
        self.type_traveler.is_none()
            && self.country.is_none()
            && self.type_trip.is_none()
            && self.trip_description.is_none()
            && self.trip_photos.is_none()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_trip_requires_core_fields() {
        let request: CreateTripRequest = serde_json::from_str(r#"{"country": "Japan"}"#).unwrap();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("type_traveler"));
        assert!(fields.contains_key("type_trip"));
        assert!(fields.contains_key("trip_description"));
        assert!(!fields.contains_key("country"));
    }

    #[test]
    fn test_create_trip_valid() {
        let request: CreateTripRequest = serde_json::from_str(
            r#"{
                "typeTraveler": "family",
                "country": "Japan",
                "typeTrip": "culture",
                "tripDescription": ["Tokyo", "Kyoto"]
            }"#,
        )
        .unwrap();

        assert!(request.validate().is_ok());
        assert!(request.trip_photos.is_empty());
    }

    #[test]
    fn test_update_trip_rejects_empty_description() {
        let request: UpdateTripRequest =
            serde_json::from_str(r#"{"tripDescription": []}"#).unwrap();
        assert!(request.validate().is_err());

        let request: UpdateTripRequest = serde_json::from_str(r#"{"country": "Peru"}"#).unwrap();
        assert!(request.validate().is_ok());
        assert!(!request.is_empty());
    }

    #[test]
    fn test_create_trip_rejects_blank_fields() {
        let request: CreateTripRequest = serde_json::from_str(
            r#"{"typeTraveler": "  ", "country": "   ", "typeTrip": " ", "tripDescription": ["x"]}"#,
        )
        .unwrap();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("type_traveler"));
        assert!(fields.contains_key("country"));
        assert!(fields.contains_key("type_trip"));
    }

    #[test]
    fn test_create_trip_trims_fields() {
        let request: CreateTripRequest = serde_json::from_str(
            r#"{"typeTraveler": " solo ", "country": " Peru", "typeTrip": "hiking ", "tripDescription": ["x"]}"#,
        )
        .unwrap();

        assert!(request.validate().is_ok());
        assert_eq!(request.country, "Peru");
        assert_eq!(request.type_trip, "hiking");
        assert_eq!(request.type_traveler, "solo");
    }

    #[test]
    fn test_update_trip_rejects_blank_fields() {
        let request: UpdateTripRequest = serde_json::from_str(r#"{"country": "   "}"#).unwrap();
        assert_eq!(request.country.as_deref(), Some(""));
        assert!(request.validate().is_err());

        let request: UpdateTripRequest = serde_json::from_str(r#"{"typeTrip": " beach "}"#).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.type_trip.as_deref(), Some("beach"));
    }
}
