//! Service crate for the marketplace review desk.
//!
//! This crate contains the review board that coordinates the stores, the
//! catalogue and the aggregation pipeline.

pub mod board;

pub use board::{ReviewBoard, ReviewListing, ShopSummary};
