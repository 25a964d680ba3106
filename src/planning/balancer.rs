//! Category coverage checks against duration-scaled minimums
//!
//! Advisory only: the caller decides whether a shortfall should trigger
//! another candidate search before assembly.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::BalancerConfig;
use crate::models::{Candidate, Category};

#[derive(Debug, Clone)]
pub struct CategoryBalancer {
    per_day: BTreeMap<Category, usize>,
}

impl Default for CategoryBalancer {
    fn default() -> Self {
        Self::from_config(&BalancerConfig::default())
    }
}

impl CategoryBalancer {
    #[must_use]
    pub fn from_config(config: &BalancerConfig) -> Self {
        let per_day = [
            (Category::Spot, config.spot),
            (Category::Food, config.food),
            (Category::Cafe, config.cafe),
        ]
        .into_iter()
        .filter(|(_, n)| *n > 0)
        .collect();
        Self { per_day }
    }

    /// Count candidates per category
    #[must_use]
    pub fn count_by_category(candidates: &[Candidate]) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for candidate in candidates {
            *counts.entry(candidate.category).or_insert(0) += 1;
        }
        counts
    }

    /// Required total for `category` over a trip of `duration` days
    #[must_use]
    pub fn required_total(&self, category: Category, duration: usize) -> usize {
        self.per_day.get(&category).map_or(0, |n| n * duration)
    }

    /// Categories whose count falls below the required total
    #[must_use]
    pub fn find_missing_categories(
        &self,
        counts: &BTreeMap<Category, usize>,
        duration: usize,
    ) -> Vec<Category> {
        self.shortfalls(counts, duration).into_keys().collect()
    }

    /// Deficit per missing category
    #[must_use]
    pub fn shortfalls(
        &self,
        counts: &BTreeMap<Category, usize>,
        duration: usize,
    ) -> BTreeMap<Category, usize> {
        let shortfalls: BTreeMap<Category, usize> = self
            .per_day
            .keys()
            .filter_map(|&category| {
                let required = self.required_total(category, duration);
                let actual = counts.get(&category).copied().unwrap_or(0);
                (actual < required).then(|| (category, required - actual))
            })
            .collect();

        if !shortfalls.is_empty() {
            debug!("Category shortfall for {} days: {:?}", duration, shortfalls);
        }
        shortfalls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(spots: usize, foods: usize, cafes: usize) -> Vec<Candidate> {
        let mut out = Vec::new();
        for i in 0..spots {
            out.push(Candidate::new(format!("s{i}"), 37.0, 127.0, Category::Spot, 1.0));
        }
        for i in 0..foods {
            out.push(Candidate::new(format!("f{i}"), 37.0, 127.0, Category::Food, 1.0));
        }
        for i in 0..cafes {
            out.push(Candidate::new(format!("c{i}"), 37.0, 127.0, Category::Cafe, 1.0));
        }
        out
    }

    #[test]
    fn test_count_by_category() {
        let counts = CategoryBalancer::count_by_category(&candidates(2, 3, 0));
        assert_eq!(counts.get(&Category::Spot), Some(&2));
        assert_eq!(counts.get(&Category::Food), Some(&3));
        assert_eq!(counts.get(&Category::Cafe), None);
    }

    #[test]
    fn test_missing_categories_scale_with_duration() {
        let balancer = CategoryBalancer::default();
        let counts = CategoryBalancer::count_by_category(&candidates(8, 6, 1));

        assert!(balancer.find_missing_categories(&counts, 1).is_empty());

        // Two days need 8 spots, 6 food and 2 cafes
        assert_eq!(balancer.find_missing_categories(&counts, 2), vec![Category::Cafe]);

        let missing = balancer.find_missing_categories(&counts, 3);
        assert_eq!(missing, vec![Category::Spot, Category::Food, Category::Cafe]);
    }

    #[test]
    fn test_shortfalls_report_deficit() {
        let balancer = CategoryBalancer::default();
        let counts = CategoryBalancer::count_by_category(&candidates(5, 3, 0));
        let shortfalls = balancer.shortfalls(&counts, 2);

        assert_eq!(shortfalls.get(&Category::Spot), Some(&3));
        assert_eq!(shortfalls.get(&Category::Food), Some(&3));
        assert_eq!(shortfalls.get(&Category::Cafe), Some(&2));
    }

    #[test]
    fn test_unlisted_categories_are_never_missing() {
        let balancer = CategoryBalancer::default();
        let counts = BTreeMap::new();
        let missing = balancer.find_missing_categories(&counts, 1);
        assert!(!missing.contains(&Category::Shopping));
        assert_eq!(balancer.required_total(Category::Stay, 4), 0);
    }

    #[test]
    fn test_custom_baselines() {
        let balancer = CategoryBalancer::from_config(&BalancerConfig {
            spot: 1,
            food: 0,
            cafe: 0,
        });
        let counts = CategoryBalancer::count_by_category(&candidates(1, 0, 0));
        assert!(balancer.find_missing_categories(&counts, 1).is_empty());
        assert_eq!(balancer.find_missing_categories(&counts, 2), vec![Category::Spot]);
    }
}
