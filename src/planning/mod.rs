//! Itinerary synthesis
//!
//! This module turns a pool of scored candidates into a day-by-day plan:
//! - Category balancing: advisory shortfall check before allocation
//! - Day strategy: per-day quotas derived from trip duration
//! - Assembly: greedy, continuity-aware allocation of candidates into days

pub mod assembler;
pub mod balancer;
pub mod day_strategy;

pub use assembler::{DayPlanResult, ItineraryAssembler, TravelPlanResult};
pub use balancer::CategoryBalancer;
pub use day_strategy::{DayPlanStrategy, DayShape, DayTarget};

use serde::Serialize;
use tracing::{info, instrument};

use crate::clustering::GeoClusterer;
use crate::config::PlannerConfig;
use crate::models::{Candidate, Category};

/// Assembled plan together with the advisory category check
#[derive(Debug, Clone, Serialize)]
pub struct TripPlan {
    pub plan: TravelPlanResult,
    /// Categories the candidate pool could not cover for this duration
    pub missing_categories: Vec<Category>,
    pub cluster_count: usize,
    pub noise_count: usize,
}

/// Cluster, balance-check and assemble a trip of `duration` days
#[instrument(level = "debug", skip(candidates, config), fields(candidates = candidates.len()))]
pub fn plan_trip(candidates: &[Candidate], duration: usize, config: &PlannerConfig) -> TripPlan {
    let bundle = GeoClusterer::from_config(&config.clustering).cluster(candidates);

    let balancer = CategoryBalancer::from_config(&config.balancer);
    let counts = CategoryBalancer::count_by_category(candidates);
    let missing_categories = balancer.find_missing_categories(&counts, duration);

    let targets = DayPlanStrategy::create_day_targets(duration);
    let plan = ItineraryAssembler::assemble(&bundle, &targets);

    info!(
        "Planned {} days with {} places from {} candidates",
        plan.duration(),
        plan.total_place_count(),
        candidates.len()
    );

    TripPlan {
        plan,
        missing_categories,
        cluster_count: bundle.cluster_count(),
        noise_count: bundle.noise.len(),
    }
}
