//! Read-only view of a persisted plan

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Summary of a user's active plan as reported by the plan store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSnapshot {
    pub plan_id: i64,
    pub user_id: i64,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl PlanSnapshot {
    /// Number of calendar days the plan spans, inclusive
    #[must_use]
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_days_is_inclusive() {
        let plan = PlanSnapshot {
            plan_id: 1,
            user_id: 7,
            title: "Busan".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
        };
        assert_eq!(plan.duration_days(), 3);
    }
}
