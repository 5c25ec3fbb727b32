//! End-to-end tests for the review board.
//!
//! Most tests run over `MemoryStorage`; the persistence tests reopen a board
//! on a `FileStorage` in a temporary directory.

use std::sync::Arc;

use catalog::{
    Aspect, AspectRatings, CatalogError, FileStorage, MemoryStorage, ReviewDraft,
    ShopReviewDraft, ValidationError,
};
use pipeline::{
    OfferCriteria, OfferSort, PageRequest, ReviewCriteria, ReviewSort, ShopCriteria,
    ShopReviewCriteria, ShopSort,
};
use service::ReviewBoard;
use tempfile::TempDir;

fn memory_board() -> ReviewBoard<MemoryStorage> {
    ReviewBoard::open(Arc::new(MemoryStorage::new())).unwrap()
}

fn draft(subject: &str, rating: u8, comment: &str) -> ReviewDraft {
    ReviewDraft {
        subject_id: subject.to_string(),
        author_id: "user-42".to_string(),
        author_name: "Sam".to_string(),
        rating,
        title: Some("Worth it".to_string()),
        comment: comment.to_string(),
        photos: vec![],
        verified_purchase: true,
    }
}

fn shop_draft(shop: &str, aspects: AspectRatings) -> ShopReviewDraft {
    ShopReviewDraft {
        review: draft(shop, 4, "Packed with care."),
        aspects,
        recommendation: true,
        order_verified: true,
    }
}

#[test]
fn test_item_reviews_stats_cover_unfiltered_collection() {
    let board = memory_board();
    let criteria = ReviewCriteria {
        rating_equals: Some(4),
        ..Default::default()
    };

    let listing = board
        .item_reviews("offer-1", &criteria, PageRequest::default())
        .unwrap();

    assert_eq!(listing.stats.total_count, 5);
    assert_eq!(listing.page.total_items, 3);
    assert!(listing.page.items.iter().all(|r| r.rating == 4));
}

#[test]
fn test_submit_review_is_listed_first() {
    let mut board = memory_board();

    let review = board
        .submit_review(draft("offer-4", 5, "  Soft and thick.  "))
        .unwrap();
    assert!(review.id.starts_with("review-"));
    assert_eq!(review.created_at, review.updated_at);
    assert_eq!(review.comment, "Soft and thick.");
    assert_eq!(review.helpful_count, 0);

    let listing = board
        .item_reviews("offer-4", &ReviewCriteria::default(), PageRequest::default())
        .unwrap();
    assert_eq!(listing.stats.total_count, 1);
    assert_eq!(listing.stats.average_rating, 5.0);
    assert_eq!(listing.page.items[0].id, review.id);
}

#[test]
fn test_submit_rejects_invalid_drafts() {
    let mut board = memory_board();

    let err = board
        .submit_review(draft("offer-1", 0, "no stars"))
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CatalogError>(),
        Some(CatalogError::ValidationError(ValidationError::RatingOutOfRange(0)))
    ));

    let err = board.submit_review(draft("offer-1", 3, "   ")).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CatalogError>(),
        Some(CatalogError::ValidationError(ValidationError::EmptyComment))
    ));

    let err = board
        .submit_review(draft("offer-404", 3, "fine"))
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CatalogError>(),
        Some(CatalogError::UnknownSubject { .. })
    ));

    let err = board
        .submit_shop_review(shop_draft("shop-1", AspectRatings::new()))
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CatalogError>(),
        Some(CatalogError::ValidationError(ValidationError::NoAspectRated))
    ));

    // Nothing was stored
    let listing = board
        .item_reviews("offer-1", &ReviewCriteria::default(), PageRequest::default())
        .unwrap();
    assert_eq!(listing.stats.total_count, 5);
}

#[test]
fn test_shop_review_flow() {
    let mut board = memory_board();

    let submitted = board
        .submit_shop_review(shop_draft(
            "shop-3",
            AspectRatings::new().with(Aspect::Service, 5).with(Aspect::Value, 3),
        ))
        .unwrap();
    assert!(submitted.review.id.starts_with("shop-review-"));

    let criteria = ShopReviewCriteria {
        aspect_present: Some(Aspect::Value),
        ..Default::default()
    };
    let listing = board
        .shop_reviews("shop-3", &criteria, PageRequest::default())
        .unwrap();

    assert_eq!(listing.stats.overall.total_count, 1);
    assert_eq!(listing.stats.aspect_average(Aspect::Service), 5.0);
    assert_eq!(listing.stats.aspect_average(Aspect::Shipping), 0.0);
    assert_eq!(listing.stats.recommendation_percentage, 100.0);
    assert_eq!(listing.page.items.len(), 1);
}

#[test]
fn test_mark_helpful_finds_both_kinds() {
    let mut board = memory_board();

    assert!(board.mark_helpful("review-seed-5").unwrap());
    assert!(board.mark_helpful("review-seed-5").unwrap());
    assert!(board.mark_helpful("shop-review-seed-4").unwrap());
    assert!(!board.mark_helpful("nope").unwrap());

    let criteria = ReviewCriteria {
        sort_key: Some(ReviewSort::MostHelpful),
        ..Default::default()
    };
    let listing = board
        .item_reviews("offer-1", &criteria, PageRequest::default())
        .unwrap();
    let seed_5 = listing
        .page
        .items
        .iter()
        .find(|r| r.id == "review-seed-5")
        .unwrap();
    assert_eq!(seed_5.helpful_count, 3);
}

#[test]
fn test_offers_and_shops() {
    let board = memory_board();

    let criteria = OfferCriteria {
        in_stock_only: true,
        sort_key: Some(OfferSort::PriceLow),
        ..Default::default()
    };
    let page = board.offers(&criteria, PageRequest::new(1, 2));
    let ids: Vec<_> = page.items.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec!["offer-4", "offer-5"]);
    assert_eq!(page.total_items, 4);
    assert_eq!(page.total_pages, 2);

    let criteria = ShopCriteria {
        sort_key: Some(ShopSort::Reviews),
        ..Default::default()
    };
    let page = board.shops(&criteria, PageRequest::default());
    assert_eq!(page.items[0].shop.id, "shop-1");
    assert_eq!(page.items[0].stats.overall.total_count, 4);
    assert_eq!(page.items[0].stats.recommendation_percentage, 75.0);
}

#[test]
fn test_state_survives_reopen_on_disk() {
    let dir = TempDir::new().unwrap();
    let storage = Arc::new(FileStorage::new(dir.path()));

    let submitted = {
        let mut board = ReviewBoard::open(storage.clone()).unwrap();
        board.mark_helpful("review-seed-8").unwrap();
        board
            .submit_review(draft("offer-5", 4, "Pitched it in ten minutes."))
            .unwrap()
    };
    assert!(dir.path().join("marketplace_reviews.json").exists());

    let board = ReviewBoard::open(storage).unwrap();
    let listing = board
        .item_reviews("offer-5", &ReviewCriteria::default(), PageRequest::default())
        .unwrap();
    assert_eq!(listing.page.items, vec![submitted]);

    let listing = board
        .item_reviews("offer-3", &ReviewCriteria::default(), PageRequest::default())
        .unwrap();
    assert_eq!(listing.page.items[0].helpful_count, 10);
}

#[test]
fn test_reset_goes_back_to_seed() {
    let dir = TempDir::new().unwrap();
    let storage = Arc::new(FileStorage::new(dir.path()));
    let mut board = ReviewBoard::open(storage.clone()).unwrap();

    board
        .submit_review(draft("offer-2", 1, "Stopped charging after a week."))
        .unwrap();
    board
        .submit_shop_review(shop_draft("shop-2", AspectRatings::new().with(Aspect::Quality, 2)))
        .unwrap();

    board.reset().unwrap();
    assert!(!dir.path().join("marketplace_reviews.json").exists());
    assert!(!dir.path().join("marketplace_shop_reviews.json").exists());

    let listing = board
        .item_reviews("offer-2", &ReviewCriteria::default(), PageRequest::default())
        .unwrap();
    assert_eq!(listing.stats.total_count, 2);

    let reopened = ReviewBoard::open(storage).unwrap();
    let listing = reopened
        .shop_reviews("shop-2", &ShopReviewCriteria::default(), PageRequest::default())
        .unwrap();
    assert_eq!(listing.stats.overall.total_count, 3);
}
