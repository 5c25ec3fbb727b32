//! Fixture builders shared by the unit tests.

use catalog::{AspectRatings, Offer, Photo, Review, Shop, ShopReview};
use chrono::{DateTime, TimeZone, Utc};

/// Noon UTC on the given day of May 2024
pub fn day(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap()
}

pub fn photo(id: &str) -> Photo {
    Photo {
        id: id.to_string(),
        url: format!("/uploads/{id}.jpg"),
        filename: format!("{id}.jpg"),
    }
}

pub fn review(id: &str, rating: u8) -> Review {
    Review {
        id: id.to_string(),
        subject_id: "offer-1".to_string(),
        author_id: "user-1".to_string(),
        author_name: "Test".to_string(),
        rating,
        title: None,
        comment: "fine".to_string(),
        photos: vec![],
        created_at: day(1),
        updated_at: day(1),
        helpful_count: 0,
        verified_purchase: false,
    }
}

pub fn shop_review(
    id: &str,
    rating: u8,
    aspects: AspectRatings,
    recommendation: bool,
) -> ShopReview {
    let mut review = review(id, rating);
    review.subject_id = "shop-1".to_string();
    ShopReview {
        review,
        aspects,
        recommendation,
        order_verified: false,
    }
}

pub fn offer(id: &str, category: &str, price: u64) -> Offer {
    Offer {
        id: id.to_string(),
        shop_id: "shop-1".to_string(),
        title: format!("Offer {id}"),
        description: String::new(),
        category: category.to_string(),
        price,
        rating: 0.0,
        review_count: 0,
        stock: 1,
        created_at: day(1),
    }
}

pub fn shop(id: &str, name: &str, rating: f64) -> Shop {
    Shop {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        category: "home".to_string(),
        location: String::new(),
        rating,
        review_count: 0,
        verified: false,
        created_at: day(1),
    }
}
