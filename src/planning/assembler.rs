//! Greedy allocation of clustered candidates into days
//!
//! Each day first satisfies its required categories (food and spots before
//! the rest), then tops up with filler until its capacity is reached. Every
//! pick prefers the candidate whose cluster lies closest to the last placed
//! stop, so consecutive stops and consecutive days stay geographically
//! close. A single `used` set spans the whole pass.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use tracing::debug;

use super::DayTarget;
use crate::clustering::ClusterBundle;
use crate::models::{Candidate, Category, haversine_meters};
use crate::{PlannerError, Result};

/// A day target bound to the candidates placed on it
#[derive(Debug, Clone, Serialize)]
pub struct DayPlanResult {
    /// 1-based day number
    pub day: usize,
    pub target: DayTarget,
    /// Candidates in placement order
    pub places: Vec<Candidate>,
}

impl DayPlanResult {
    #[must_use]
    pub fn total(&self) -> usize {
        self.places.len()
    }

    #[must_use]
    pub fn category_count(&self, category: Category) -> usize {
        self.places.iter().filter(|p| p.category == category).count()
    }

    /// Unmet minimum per required category
    #[must_use]
    pub fn shortfall(&self) -> BTreeMap<Category, usize> {
        self.target
            .required
            .iter()
            .filter_map(|(&category, &minimum)| {
                let placed = self.category_count(category);
                (placed < minimum).then(|| (category, minimum - placed))
            })
            .collect()
    }
}

/// Ordered day plans for days `1..=duration`
#[derive(Debug, Clone, Default, Serialize)]
pub struct TravelPlanResult {
    days: Vec<DayPlanResult>,
}

impl TravelPlanResult {
    #[must_use]
    pub fn days(&self) -> &[DayPlanResult] {
        &self.days
    }

    #[must_use]
    pub fn duration(&self) -> usize {
        self.days.len()
    }

    /// Day `n`, counting from 1
    pub fn day(&self, n: usize) -> Result<&DayPlanResult> {
        if n == 0 || n > self.days.len() {
            return Err(PlannerError::DayOutOfRange {
                day: n,
                duration: self.days.len(),
            });
        }
        Ok(&self.days[n - 1])
    }

    #[must_use]
    pub fn total_place_count(&self) -> usize {
        self.days.iter().map(DayPlanResult::total).sum()
    }

    #[must_use]
    pub fn category_count(&self, category: Category) -> usize {
        self.days.iter().map(|d| d.category_count(category)).sum()
    }

    /// Whether any day missed one of its minimums
    #[must_use]
    pub fn has_shortfall(&self) -> bool {
        self.days.iter().any(|d| !d.shortfall().is_empty())
    }
}

/// Pool entry: a candidate plus the position used for continuity ranking
struct PoolEntry<'a> {
    candidate: &'a Candidate,
    /// Cluster center, or the candidate's own position for noise
    anchor: (f64, f64),
    clustered: bool,
}

pub struct ItineraryAssembler;

impl ItineraryAssembler {
    #[must_use]
    pub fn assemble(bundle: &ClusterBundle, targets: &[DayTarget]) -> TravelPlanResult {
        let pool = Self::build_pool(bundle);
        let mut used: HashSet<&str> = HashSet::new();
        let mut anchor = Self::starting_anchor(&pool);
        let mut days = Vec::with_capacity(targets.len());

        for (index, target) in targets.iter().enumerate() {
            let mut places = Vec::new();

            let mut required: Vec<(Category, usize)> =
                target.required.iter().map(|(&c, &n)| (c, n)).collect();
            required.sort_by_key(|(c, _)| c.priority());

            for (category, minimum) in required {
                for _ in 0..minimum {
                    if places.len() >= target.max_total {
                        break;
                    }
                    let Some(pick) = Self::pick(&pool, &used, anchor, Some(category)) else {
                        break;
                    };
                    Self::place(&pool[pick], &mut used, &mut anchor, &mut places);
                }
            }

            while places.len() < target.max_total {
                let Some(pick) = Self::pick(&pool, &used, anchor, None) else {
                    break;
                };
                Self::place(&pool[pick], &mut used, &mut anchor, &mut places);
            }

            let day = DayPlanResult {
                day: index + 1,
                target: target.clone(),
                places,
            };
            let shortfall = day.shortfall();
            if shortfall.is_empty() {
                debug!("Day {} assembled with {} places", day.day, day.total());
            } else {
                debug!(
                    "Day {} assembled with {} places, short of {:?}",
                    day.day,
                    day.total(),
                    shortfall
                );
            }
            days.push(day);
        }

        TravelPlanResult { days }
    }

    /// Flatten the bundle, keeping the first occurrence of each id
    fn build_pool(bundle: &ClusterBundle) -> Vec<PoolEntry<'_>> {
        let mut seen = HashSet::new();
        let mut pool = Vec::with_capacity(bundle.len());

        for cluster in &bundle.clusters {
            let center = cluster.center();
            for member in &cluster.members {
                if seen.insert(member.id.as_str()) {
                    pool.push(PoolEntry {
                        candidate: member,
                        anchor: center,
                        clustered: true,
                    });
                }
            }
        }
        for candidate in &bundle.noise {
            if seen.insert(candidate.id.as_str()) {
                pool.push(PoolEntry {
                    candidate,
                    anchor: candidate.position(),
                    clustered: false,
                });
            }
        }
        pool
    }

    /// Start from the cluster of the most relevant candidate
    fn starting_anchor(pool: &[PoolEntry<'_>]) -> Option<(f64, f64)> {
        pool.iter()
            .max_by(|a, b| {
                a.candidate
                    .score
                    .total_cmp(&b.candidate.score)
                    .then_with(|| b.candidate.id.cmp(&a.candidate.id))
            })
            .map(|entry| entry.anchor)
    }

    fn pick(
        pool: &[PoolEntry<'_>],
        used: &HashSet<&str>,
        anchor: Option<(f64, f64)>,
        category: Option<Category>,
    ) -> Option<usize> {
        pool.iter()
            .enumerate()
            .filter(|(_, entry)| !used.contains(entry.candidate.id.as_str()))
            .filter(|(_, entry)| category.is_none_or(|c| entry.candidate.category == c))
            .min_by(|(_, a), (_, b)| Self::rank(a, b, anchor))
            .map(|(i, _)| i)
    }

    /// Nearer cluster first, clustered before noise, then higher score, then id
    fn rank(a: &PoolEntry<'_>, b: &PoolEntry<'_>, anchor: Option<(f64, f64)>) -> Ordering {
        let distance = |entry: &PoolEntry<'_>| {
            anchor.map_or(0.0, |from| haversine_meters(from, entry.anchor))
        };

        distance(a)
            .total_cmp(&distance(b))
            .then_with(|| b.clustered.cmp(&a.clustered))
            .then_with(|| b.candidate.score.total_cmp(&a.candidate.score))
            .then_with(|| a.candidate.id.cmp(&b.candidate.id))
    }

    fn place<'a>(
        entry: &PoolEntry<'a>,
        used: &mut HashSet<&'a str>,
        anchor: &mut Option<(f64, f64)>,
        places: &mut Vec<Candidate>,
    ) {
        used.insert(entry.candidate.id.as_str());
        *anchor = Some(entry.anchor);
        places.push(entry.candidate.clone());
    }
}
