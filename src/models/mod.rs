//! Data models shared by the synthesis and editing engines
//!
//! - Candidate: scored point of interest with coordinates and category
//! - Plan: read-only view of an existing itinerary used for validation

pub mod candidate;
pub mod plan;

// Re-export all public types for convenient access
pub use candidate::{Candidate, Category, haversine_meters};
pub use plan::PlanSnapshot;
