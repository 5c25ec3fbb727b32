//! The review store: one in-memory collection per review kind, mirrored to
//! key/value storage after every mutation.
//!
//! Loading follows the storefront's recovery rules:
//! 1. Read the collection's fixed key
//! 2. Nothing stored yet -> start from the bundled seed
//! 3. Stored value doesn't parse, or holds a review outside the domain
//!    (rating, photo count, aspect score) -> log it and start from the seed
//! 4. Storage itself fails -> surface the error
//!
//! Mutations write the updated collection first and only change memory once
//! the write succeeded, so a failed write leaves the store as it was.

use crate::draft::MAX_PHOTOS;
use crate::error::{CatalogError, Result, ValidationError};
use crate::seed;
use crate::storage::KeyValueStorage;
use crate::types::*;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A review kind that has its own persisted collection.
pub trait StoredReview: ReviewRecord + Clone + Serialize + DeserializeOwned {
    /// Storage key the collection lives under
    const STORAGE_KEY: &'static str;

    /// Bundled collection used when nothing usable is persisted
    fn seed() -> Result<Vec<Self>>;

    /// Domain rules a persisted review must still satisfy
    fn check(&self) -> std::result::Result<(), ValidationError>;
}

fn check_review(review: &Review) -> std::result::Result<(), ValidationError> {
    if !(MIN_RATING..=MAX_RATING).contains(&review.rating) {
        return Err(ValidationError::RatingOutOfRange(review.rating));
    }
    if review.photos.len() > MAX_PHOTOS {
        return Err(ValidationError::TooManyPhotos {
            count: review.photos.len(),
            max: MAX_PHOTOS,
        });
    }
    Ok(())
}

impl StoredReview for Review {
    const STORAGE_KEY: &'static str = "marketplace_reviews";

    fn seed() -> Result<Vec<Self>> {
        seed::reviews()
    }

    fn check(&self) -> std::result::Result<(), ValidationError> {
        check_review(self)
    }
}

impl StoredReview for ShopReview {
    const STORAGE_KEY: &'static str = "marketplace_shop_reviews";

    fn seed() -> Result<Vec<Self>> {
        seed::shop_reviews()
    }

    fn check(&self) -> std::result::Result<(), ValidationError> {
        check_review(&self.review)?;
        match self.aspects.iter().find(|(_, score)| *score > MAX_RATING) {
            Some((aspect, value)) => Err(ValidationError::AspectOutOfRange { aspect, value }),
            None => Ok(()),
        }
    }
}

/// Holds every review of one kind, most recent submission first.
///
/// Mutations go through `&mut self`, so a store has exactly one writer;
/// several stores may share a storage backend.
pub struct ReviewStore<R, S> {
    reviews: Vec<R>,
    storage: Arc<S>,
}

impl<R, S> ReviewStore<R, S>
where
    R: StoredReview,
    S: KeyValueStorage,
{
    /// Load the collection from `storage`, falling back to the seed.
    pub fn load(storage: Arc<S>) -> Result<Self> {
        let reviews = match storage.get(R::STORAGE_KEY)? {
            Some(raw) => match decode::<R>(&raw) {
                Ok(reviews) => {
                    info!("Loaded {} reviews from '{}'", reviews.len(), R::STORAGE_KEY);
                    reviews
                }
                Err(e) => {
                    warn!(
                        "Stored value under '{}' is malformed ({}), falling back to seed data",
                        R::STORAGE_KEY,
                        e
                    );
                    R::seed()?
                }
            },
            None => {
                info!("Nothing stored under '{}', using seed data", R::STORAGE_KEY);
                R::seed()?
            }
        };

        Ok(Self { reviews, storage })
    }

    /// All reviews for one offer or shop, unfiltered, in insertion order.
    ///
    /// Returns an owned snapshot; later mutations don't affect it.
    pub fn list_by_subject(&self, subject_id: &str) -> Vec<R> {
        self.reviews
            .iter()
            .filter(|review| review.subject_id() == subject_id)
            .cloned()
            .collect()
    }

    pub fn get(&self, review_id: &str) -> Option<&R> {
        self.reviews.iter().find(|review| review.id() == review_id)
    }

    /// Every review of this kind
    pub fn all(&self) -> &[R] {
        &self.reviews
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    /// Prepend an already validated review and persist the collection.
    pub fn append(&mut self, review: R) -> Result<()> {
        debug!("Appending review {} for {}", review.id(), review.subject_id());

        let mut next: Vec<&R> = Vec::with_capacity(self.reviews.len() + 1);
        next.push(&review);
        next.extend(self.reviews.iter());
        self.persist(&next)?;

        self.reviews.insert(0, review);
        Ok(())
    }

    /// Add one helpful vote.
    ///
    /// Returns `Ok(false)` without touching storage when no review has that
    /// id.
    pub fn increment_helpful(&mut self, review_id: &str) -> Result<bool> {
        let Some(index) = self.reviews.iter().position(|r| r.id() == review_id) else {
            debug!("No review with id {}, helpful vote ignored", review_id);
            return Ok(false);
        };

        let mut voted = self.reviews[index].clone();
        voted.mark_helpful();

        let next: Vec<&R> = self
            .reviews
            .iter()
            .enumerate()
            .map(|(i, review)| if i == index { &voted } else { review })
            .collect();
        self.persist(&next)?;

        self.reviews[index] = voted;
        Ok(true)
    }

    /// Throw away everything stored and go back to the seed data.
    pub fn reset(&mut self) -> Result<()> {
        self.storage.remove(R::STORAGE_KEY)?;
        self.reviews = R::seed()?;
        info!("Reset '{}' to {} seed reviews", R::STORAGE_KEY, self.reviews.len());
        Ok(())
    }

    fn persist(&self, reviews: &[&R]) -> Result<()> {
        let raw = serde_json::to_string(reviews)?;
        self.storage.set(R::STORAGE_KEY, &raw)
    }
}

/// Parse a persisted collection and reject it if any review breaks the
/// domain rules.
fn decode<R: StoredReview>(raw: &str) -> Result<Vec<R>> {
    let reviews: Vec<R> = serde_json::from_str(raw)?;
    for review in &reviews {
        review.check().map_err(|e| CatalogError::InvalidValue {
            field: format!("review {}", review.id()),
            value: e.to_string(),
        })?;
    }
    Ok(reviews)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use chrono::Utc;

    /// Reads nothing and refuses every write
    struct FullDisk;

    impl KeyValueStorage for FullDisk {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(std::io::Error::other("disk full").into())
        }

        fn remove(&self, _key: &str) -> Result<()> {
            Ok(())
        }
    }

    fn review(id: &str, subject: &str) -> Review {
        let now = Utc::now();
        Review {
            id: id.to_string(),
            subject_id: subject.to_string(),
            author_id: "user-1".to_string(),
            author_name: "Test".to_string(),
            rating: 3,
            title: None,
            comment: "ok".to_string(),
            photos: vec![],
            created_at: now,
            updated_at: now,
            helpful_count: 0,
            verified_purchase: false,
        }
    }

    #[test]
    fn test_empty_storage_loads_seed() {
        let storage = Arc::new(MemoryStorage::new());
        let store: ReviewStore<Review, _> = ReviewStore::load(storage.clone()).unwrap();

        assert_eq!(store.len(), seed::reviews().unwrap().len());
        // Loading alone doesn't write anything
        assert_eq!(storage.get(Review::STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_malformed_storage_falls_back_to_seed() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(ShopReview::STORAGE_KEY, "{not json").unwrap();

        let store: ReviewStore<ShopReview, _> = ReviewStore::load(storage).unwrap();
        assert_eq!(store.len(), seed::shop_reviews().unwrap().len());
    }

    #[test]
    fn test_append_prepends_and_persists() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store: ReviewStore<Review, _> = ReviewStore::load(storage.clone()).unwrap();

        store.append(review("r-new", "offer-1")).unwrap();
        assert_eq!(store.all()[0].id, "r-new");

        let reloaded: ReviewStore<Review, _> = ReviewStore::load(storage).unwrap();
        assert_eq!(reloaded.len(), store.len());
        assert_eq!(reloaded.all()[0].id, "r-new");
    }

    #[test]
    fn test_list_by_subject_keeps_insertion_order() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(Review::STORAGE_KEY, "[]").unwrap();
        let mut store: ReviewStore<Review, _> = ReviewStore::load(storage).unwrap();
        assert!(store.is_empty());

        store.append(review("a", "offer-1")).unwrap();
        store.append(review("b", "offer-2")).unwrap();
        store.append(review("c", "offer-1")).unwrap();

        let ids: Vec<_> = store
            .list_by_subject("offer-1")
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["c", "a"]);
        assert!(store.list_by_subject("offer-9").is_empty());
    }

    #[test]
    fn test_increment_helpful() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store: ReviewStore<Review, _> = ReviewStore::load(storage.clone()).unwrap();
        let before = store.get("review-seed-2").unwrap().helpful_count;

        assert!(store.increment_helpful("review-seed-2").unwrap());
        assert_eq!(store.get("review-seed-2").unwrap().helpful_count, before + 1);

        let reloaded: ReviewStore<Review, _> = ReviewStore::load(storage).unwrap();
        assert_eq!(reloaded.get("review-seed-2").unwrap().helpful_count, before + 1);
    }

    #[test]
    fn test_increment_helpful_unknown_id_is_noop() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store: ReviewStore<Review, _> = ReviewStore::load(storage.clone()).unwrap();

        assert!(!store.increment_helpful("missing").unwrap());
        assert_eq!(storage.get(Review::STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_reset_restores_seed() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store: ReviewStore<Review, _> = ReviewStore::load(storage.clone()).unwrap();
        store.append(review("r-new", "offer-1")).unwrap();

        store.reset().unwrap();
        assert!(store.get("r-new").is_none());
        assert_eq!(storage.get(Review::STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_failed_write_leaves_memory_untouched() {
        let mut store: ReviewStore<Review, _> = ReviewStore::load(Arc::new(FullDisk)).unwrap();
        let len = store.len();
        let helpful = store.get("review-seed-2").unwrap().helpful_count;
        assert_eq!(helpful, 7);

        assert!(store.append(review("r-new", "offer-1")).is_err());
        assert_eq!(store.len(), len);
        assert!(store.get("r-new").is_none());

        assert!(store.increment_helpful("review-seed-2").is_err());
        assert_eq!(store.get("review-seed-2").unwrap().helpful_count, helpful);
    }

    #[test]
    fn test_out_of_range_rating_falls_back_to_seed() {
        let mut stored = vec![review("good", "offer-1"), review("zero", "offer-1")];
        stored[1].rating = 0;

        let storage = Arc::new(MemoryStorage::new());
        storage
            .set(Review::STORAGE_KEY, &serde_json::to_string(&stored).unwrap())
            .unwrap();

        let store: ReviewStore<Review, _> = ReviewStore::load(storage).unwrap();
        assert_eq!(store.len(), seed::reviews().unwrap().len());
        assert!(store.get("zero").is_none());
    }

    #[test]
    fn test_too_many_photos_falls_back_to_seed() {
        let mut crowded = review("crowded", "offer-1");
        crowded.photos = (0..=MAX_PHOTOS)
            .map(|i| Photo {
                id: format!("p{i}"),
                url: format!("https://img.example/{i}.jpg"),
                filename: format!("{i}.jpg"),
            })
            .collect();

        let storage = Arc::new(MemoryStorage::new());
        storage
            .set(Review::STORAGE_KEY, &serde_json::to_string(&[crowded]).unwrap())
            .unwrap();

        let store: ReviewStore<Review, _> = ReviewStore::load(storage).unwrap();
        assert!(store.get("crowded").is_none());
    }

    #[test]
    fn test_out_of_range_aspect_falls_back_to_seed() {
        let mut stored = seed::shop_reviews().unwrap();
        stored[0].review.id = "shop-review-edited".to_string();
        stored[0].aspects = AspectRatings::new().with(Aspect::Service, 9);

        let storage = Arc::new(MemoryStorage::new());
        storage
            .set(ShopReview::STORAGE_KEY, &serde_json::to_string(&stored).unwrap())
            .unwrap();

        let store: ReviewStore<ShopReview, _> = ReviewStore::load(storage).unwrap();
        assert_eq!(store.len(), stored.len());
        assert!(store.get("shop-review-edited").is_none());
    }

    #[test]
    fn test_domain_check_reports_offending_field() {
        let mut shop = seed::shop_reviews().unwrap().remove(0);
        assert!(shop.check().is_ok());

        shop.aspects = AspectRatings::new().with(Aspect::Value, 9);
        assert_eq!(
            shop.check(),
            Err(ValidationError::AspectOutOfRange {
                aspect: Aspect::Value,
                value: 9,
            })
        );

        shop.review.rating = 6;
        assert_eq!(shop.check(), Err(ValidationError::RatingOutOfRange(6)));
    }
}
