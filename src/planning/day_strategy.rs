//! Per-day category quotas derived from trip duration

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::Category;

/// Shape of a day within the trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayShape {
    /// Single-day trip
    Light,
    /// First day of a multi-day trip
    Arrival,
    /// Any day between arrival and departure
    Full,
    /// Last day of a multi-day trip
    Departure,
}

/// Declarative quota for one day.
///
/// Categories listed in `required` must reach their minimum. Categories not
/// listed are filler: they may take whatever capacity remains up to
/// `max_total`, they are not "zero required".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayTarget {
    pub shape: DayShape,
    pub required: BTreeMap<Category, usize>,
    pub max_total: usize,
}

impl DayTarget {
    #[must_use]
    pub fn new(shape: DayShape, max_total: usize) -> Self {
        Self {
            shape,
            required: BTreeMap::new(),
            max_total,
        }
    }

    #[must_use]
    pub fn require(mut self, category: Category, minimum: usize) -> Self {
        self.required.insert(category, minimum);
        self
    }

    /// Minimum for `category`, or `None` when the category is filler
    #[must_use]
    pub fn minimum_for(&self, category: Category) -> Option<usize> {
        self.required.get(&category).copied()
    }

    #[must_use]
    pub fn required_total(&self) -> usize {
        self.required.values().sum()
    }

    /// Capacity not tied to any category minimum
    #[must_use]
    pub fn filler_slots(&self) -> usize {
        self.max_total.saturating_sub(self.required_total())
    }
}

/// Builds day shapes from the trip duration alone
pub struct DayPlanStrategy;

impl DayPlanStrategy {
    /// One target per day, in order
    #[must_use]
    pub fn create_day_targets(duration: usize) -> Vec<DayTarget> {
        match duration {
            0 => Vec::new(),
            1 => vec![Self::light_day()],
            _ => {
                let mut targets = Vec::with_capacity(duration);
                targets.push(Self::arrival_day());
                targets.extend((0..duration - 2).map(|_| Self::full_day()));
                targets.push(Self::departure_day());
                targets
            }
        }
    }

    fn light_day() -> DayTarget {
        DayTarget::new(DayShape::Light, 4)
            .require(Category::Food, 2)
            .require(Category::Spot, 2)
    }

    fn arrival_day() -> DayTarget {
        DayTarget::new(DayShape::Arrival, 4)
            .require(Category::Food, 1)
            .require(Category::Spot, 2)
    }

    fn full_day() -> DayTarget {
        DayTarget::new(DayShape::Full, 7)
            .require(Category::Food, 3)
            .require(Category::Spot, 3)
    }

    fn departure_day() -> DayTarget {
        DayTarget::new(DayShape::Departure, 3)
            .require(Category::Food, 1)
            .require(Category::Spot, 1)
    }
}
