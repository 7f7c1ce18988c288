//! 여행 검색 필터 생성
//!
//! 쿼리 스트링을 허용 목록(allow-list)에 따라 MongoDB 필터로 바꿉니다.
//! 목록에 없는 키는 무시되고, 허용된 키가 하나도 없으면 400 입니다.
//!
//! | 쿼리 키 | 문서 필드 | 값 |
//! |---------|-----------|----|
//! | `_id` | `_id` | ObjectId |
//! | `owner` | `owner_id` | ObjectId |
//! | `userName`, `imgUrl`, `typeTraveler`, `country`, `typeTrip` | snake_case 필드 | 문자열 일치 |
//! | `numOfComments`, `numOfLikes` | snake_case 필드 | 정수 |
//! | `numOfDays` | `trip_description` 길이 | 정수 (`$expr` + `$size`) |

use std::collections::HashMap;

use mongodb::bson::{doc, Document};

use crate::core::errors::{AppError, AppResult};
use crate::repositories::parse_object_id;

enum FieldKind {
    ObjectId,
    Text,
    Integer,
    DescriptionLength,
}

const ALLOWED_FIELDS: [(&str, &str, FieldKind); 10] = [
    ("_id", "_id", FieldKind::ObjectId),
    ("owner", "owner_id", FieldKind::ObjectId),
    ("userName", "user_name", FieldKind::Text),
    ("imgUrl", "img_url", FieldKind::Text),
    ("typeTraveler", "type_traveler", FieldKind::Text),
    ("country", "country", FieldKind::Text),
    ("typeTrip", "type_trip", FieldKind::Text),
    ("numOfComments", "num_of_comments", FieldKind::Integer),
    ("numOfLikes", "num_of_likes", FieldKind::Integer),
    ("numOfDays", "trip_description", FieldKind::DescriptionLength),
];

pub fn build_search_filter(params: &HashMap<String, String>) -> AppResult<Document> {
    let mut filter = Document::new();

    for (query_key, field, kind) in ALLOWED_FIELDS.iter() {
        let Some(raw) = params.get(*query_key) else {
            continue;
        };
        let value = raw.trim();

        match kind {
            FieldKind::ObjectId => {
                filter.insert(*field, parse_object_id(value, query_key)?);
            }
            FieldKind::Text => {
                filter.insert(*field, value);
            }
            FieldKind::Integer => {
                filter.insert(*field, parse_integer(query_key, value)?);
            }
            FieldKind::DescriptionLength => {
                let days = parse_integer(query_key, value)?;
                filter.insert(
                    "$expr",
                    doc! { "$eq": [ { "$size": { "$ifNull": [format!("${}", field), []] } }, days ] },
                );
            }
        }
    }

    if filter.is_empty() {
        return Err(AppError::ValidationError(
            "No valid query parameters provided".to_string(),
        ));
    }

    Ok(filter)
}

fn parse_integer(key: &str, value: &str) -> AppResult<i32> {
    value
        .parse::<i32>()
        .map_err(|_| AppError::ValidationError(format!("{} must be an integer", key)))
}
