//! 크롤러용 서버 렌더링 HTML
//!
//! 목록은 단건 페이지 링크만, 단건은 Open Graph 태그를 포함합니다.
//! 템플릿은 `templates/` 아래에 있고 askama 가 값을 이스케이프합니다.

use askama::Template;

use crate::core::errors::{AppResult, ErrorContext};
use crate::domain::entities::trips::Trip;

const DEFAULT_DESCRIPTION: &str = "A wonderful trip!";
const DEFAULT_IMAGE: &str = "/images/Logo.png";

pub struct TripLink {
    pub id: String,
    pub country: String,
    pub type_trip: String,
}

#[derive(Template)]
#[template(path = "trips_list.html")]
pub struct TripsListTemplate {
    pub trips: Vec<TripLink>,
}

#[derive(Template)]
#[template(path = "trip_detail.html")]
pub struct TripDetailTemplate {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub traveler: String,
    pub likes: i32,
}

impl TripDetailTemplate {
    /// 첫째 날 설명과 첫 사진을 쓰고, 없으면 기본값
    pub fn from_trip(trip: &Trip) -> Self {
        let description = trip
            .trip_description
            .first()
            .map(String::as_str)
            .filter(|text| !text.trim().is_empty())
            .unwrap_or(DEFAULT_DESCRIPTION);
        let image_url = trip
            .trip_photos
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_IMAGE);

        Self {
            title: format!("Trip to {} - {}", trip.country, trip.type_trip),
            description: description.to_string(),
            image_url: image_url.to_string(),
            traveler: trip.type_traveler.clone(),
            likes: trip.num_of_likes,
        }
    }
}

pub fn render_trips_as_html(trips: &[Trip]) -> AppResult<String> {
    let template = TripsListTemplate {
        trips: trips
            .iter()
            .map(|trip| TripLink {
                id: trip.id_string().unwrap_or_default(),
                country: trip.country.clone(),
                type_trip: trip.type_trip.clone(),
            })
            .collect(),
    };

    template.render().context("Failed to render trip list")
}

pub fn render_single_trip_as_html(trip: &Trip) -> AppResult<String> {
    TripDetailTemplate::from_trip(trip)
        .render()
        .context("Failed to render trip page")
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{oid::ObjectId, DateTime};

    fn trip(country: &str, photos: Vec<String>, description: Vec<String>) -> Trip {
        Trip {
            id: Some(ObjectId::new()),
            owner_id: ObjectId::new(),
            user_name: "dana".to_string(),
            img_url: None,
            type_traveler: "solo".to_string(),
            country: country.to_string(),
            type_trip: "hiking".to_string(),
            trip_photos: photos,
            trip_description: description,
            num_of_comments: 0,
            num_of_likes: 4,
            slug: "x".to_string(),
            created_at: DateTime::now(),
            updated_at: DateTime::now(),
        }
    }

    #[test]
    fn test_list_links_to_full_trip() {
        let first = trip("Chile", vec![], vec![]);
        let html = render_trips_as_html(std::slice::from_ref(&first)).unwrap();

        assert!(html.contains(&format!("/trips/FullTrip/{}", first.id_string().unwrap())));
        assert!(html.contains("Chile - hiking"));
    }

    #[test]
    fn test_empty_list_renders() {
        let html = render_trips_as_html(&[]).unwrap();
        assert!(html.contains("<h1>Trips</h1>"));
        assert!(!html.contains("<li>"));
    }

    #[test]
    fn test_single_trip_og_tags() {
        let html = render_single_trip_as_html(&trip(
            "Chile",
            vec!["a.png".to_string()],
            vec!["Torres del Paine".to_string()],
        ))
        .unwrap();

        assert!(html.contains(r#"<meta property="og:title" content="Trip to Chile - hiking" />"#));
        assert!(html.contains(r#"content="Torres del Paine""#));
        assert!(html.contains(r#"content="a.png""#));
        assert!(html.contains("Likes: 4"));
    }

    #[test]
    fn test_single_trip_defaults() {
        let page = TripDetailTemplate::from_trip(&trip("Chile", vec![], vec!["   ".to_string()]));
        assert_eq!(page.description, DEFAULT_DESCRIPTION);
        assert_eq!(page.image_url, DEFAULT_IMAGE);

        let html = page.render().unwrap();
        assert!(html.contains(DEFAULT_DESCRIPTION));
        assert!(html.contains("Logo.png"));
    }

    #[test]
    fn test_escapes_markup() {
        let html = render_single_trip_as_html(&trip("<script>alert(1)</script>", vec![], vec![])).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
