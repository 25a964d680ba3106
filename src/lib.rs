//! `tripcraft` - itinerary synthesis and safe plan mutation
//!
//! This library clusters scored candidate places, plans per-day category
//! quotas, assembles multi-day itineraries, and validates edits to existing
//! plans before they are executed.

pub mod clustering;
pub mod config;
pub mod editing;
pub mod error;
pub mod logging;
pub mod models;
pub mod planning;

// Re-export core types for public API
pub use clustering::{Cluster, ClusterBundle, GeoClusterer};
pub use config::PlannerConfig;
pub use editing::{
    EditCommand, FuzzyMatchResult, MatchTier, MutationValidator, NameResolver, PlanQuery,
    ValidationOutcome,
};
pub use error::{PlannerError, ValidationError, ValidationRule};
pub use models::{Candidate, Category, PlanSnapshot};
pub use planning::{
    CategoryBalancer, DayPlanResult, DayPlanStrategy, DayShape, DayTarget, ItineraryAssembler,
    TravelPlanResult, TripPlan, plan_trip,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
