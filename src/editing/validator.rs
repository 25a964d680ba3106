//! Pre-condition checks guarding every plan mutation
//!
//! Checks read plan state through [`PlanQuery`] and never write. Each one
//! either passes or returns a [`ValidationError`] naming the violated rule;
//! a command is only handed to the executor once every check has passed.

use chrono::{Local, NaiveDate};
use tracing::{debug, warn};

use super::command::{EditCommand, ValidationOutcome};
use crate::Result;
use crate::error::ValidationError;
use crate::models::PlanSnapshot;

/// Outcome of a single check
type Check<T = ()> = std::result::Result<T, ValidationError>;

/// Fields a mutation may change
pub const ALLOWED_FIELDS: [&str; 11] = [
    "placeName",
    "address",
    "startTime",
    "endTime",
    "cost",
    "latitude",
    "longitude",
    "category",
    "placeOrder",
    "dayOrder",
    "title",
];

/// Fields that are never mutable, even if also listed as allowed
pub const DENIED_FIELDS: [&str; 7] = [
    "id",
    "planId",
    "dayId",
    "placeId",
    "userId",
    "createdAt",
    "parentPlanId",
];

/// Read access to the plan store
pub trait PlanQuery {
    /// The user's active plan, if any
    fn active_plan_for_user(&self, user_id: i64) -> Result<Option<PlanSnapshot>>;

    /// Number of days in the plan, or `None` if the plan does not exist
    fn day_count(&self, plan_id: i64) -> Result<Option<usize>>;

    /// Number of places on a 1-based day, or `None` if the day does not exist
    fn place_count(&self, plan_id: i64, day: usize) -> Result<Option<usize>>;
}

/// Soft findings that do not block a mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationWarning {
    StartInPast { start: NaiveDate, today: NaiveDate },
}

pub struct MutationValidator<'a> {
    store: &'a dyn PlanQuery,
}

impl<'a> MutationValidator<'a> {
    #[must_use]
    pub fn new(store: &'a dyn PlanQuery) -> Self {
        Self { store }
    }

    /// Validate a whole command for the user's active plan, stopping at the
    /// first failed check
    pub fn validate_command(&self, user_id: i64, command: &EditCommand) -> ValidationOutcome {
        let outcome: ValidationOutcome = self
            .validate_active_plan(user_id)
            .and_then(|plan| self.check_command(plan.plan_id, command))
            .into();

        match &outcome {
            ValidationOutcome::Accepted => {
                debug!("Accepted {} for user {}", command.kind(), user_id);
            }
            ValidationOutcome::Rejected(err) => {
                warn!("Rejected {} for user {}: {}", command.kind(), user_id, err);
            }
        }
        outcome
    }

    fn check_command(&self, plan_id: i64, command: &EditCommand) -> Check {
        match command {
            EditCommand::DeletePlace { day, place_order } => {
                self.validate_place_exists(plan_id, *day, *place_order)
            }
            EditCommand::AddPlace { day, position, place_name } => {
                Self::validate_place_name(place_name)?;
                self.validate_insert_position(plan_id, *day, *position)
            }
            EditCommand::ReplacePlace {
                day,
                place_order,
                new_place_name,
            } => {
                Self::validate_place_name(new_place_name)?;
                self.validate_place_exists(plan_id, *day, *place_order)
            }
            EditCommand::SwapDays { day_a, day_b } => {
                self.validate_day_swap(plan_id, *day_a, *day_b)
            }
            EditCommand::SwapPlaces {
                day_a,
                order_a,
                day_b,
                order_b,
            } => self.validate_place_swap(plan_id, *day_a, *order_a, *day_b, *order_b),
            EditCommand::UpdateField {
                day,
                place_order,
                field,
                ..
            } => {
                Self::validate_allowed_field_update(field)?;
                self.validate_place_exists(plan_id, *day, *place_order)
            }
            EditCommand::Reschedule { start, end } => {
                Self::validate_date_range(*start, *end).map(|_| ())
            }
        }
    }

    /// The user has an active plan
    pub fn validate_active_plan(&self, user_id: i64) -> Check<PlanSnapshot> {
        self.store
            .active_plan_for_user(user_id)
            .map_err(|err| store_failure(&format!("active plan of user {user_id}"), &err))?
            .ok_or_else(|| ValidationError::existence(format!("User {user_id} has no active plan")))
    }

    /// The day exists in the plan; returns the plan's day count
    pub fn validate_day_exists(&self, plan_id: i64, day: usize) -> Check<usize> {
        let day_count = self.day_count(plan_id)?;
        if day == 0 || day > day_count {
            return Err(ValidationError::existence(format!(
                "Day {day} does not exist in plan {plan_id} ({day_count} days)"
            )));
        }
        Ok(day_count)
    }

    /// The place exists on the given day
    pub fn validate_place_exists(
        &self,
        plan_id: i64,
        day: usize,
        place_order: usize,
    ) -> Check {
        let place_count = self.place_count(plan_id, day)?;
        if place_order == 0 || place_order > place_count {
            return Err(ValidationError::existence(format!(
                "Place {place_order} does not exist on day {day} ({place_count} places)"
            )));
        }
        Ok(())
    }

    /// `value` lies within `[min, max]`
    pub fn validate_day_range(value: usize, min: usize, max: usize) -> Check {
        if value < min || value > max {
            return Err(ValidationError::range(format!(
                "Value {value} is outside the allowed range [{min}, {max}]"
            )));
        }
        Ok(())
    }

    /// Day index within `[1, day_count]` of the plan. A missing plan is an
    /// existence failure, a day outside the plan is a range failure.
    pub fn validate_day_index(&self, plan_id: i64, day: usize) -> Check {
        let day_count = self.day_count(plan_id)?;
        Self::validate_day_range(day, 1, day_count)
    }

    /// Place order within `[1, place_count]` of the day
    pub fn validate_place_order(
        &self,
        plan_id: i64,
        day: usize,
        place_order: usize,
    ) -> Check {
        let place_count = self.place_count(plan_id, day)?;
        Self::validate_day_range(place_order, 1, place_count)
    }

    /// Insert position within `[1, place_count + 1]` of the day
    pub fn validate_insert_position(
        &self,
        plan_id: i64,
        day: usize,
        position: usize,
    ) -> Check {
        let place_count = self.place_count(plan_id, day)?;
        Self::validate_day_range(position, 1, place_count + 1)
    }

    /// Start must not be after end. A start before today is only a warning.
    pub fn validate_date_range(
        start: NaiveDate,
        end: NaiveDate,
    ) -> Check<Option<ValidationWarning>> {
        Self::validate_date_range_at(start, end, Local::now().date_naive())
    }

    pub fn validate_date_range_at(
        start: NaiveDate,
        end: NaiveDate,
        today: NaiveDate,
    ) -> Check<Option<ValidationWarning>> {
        if start > end {
            return Err(ValidationError::date(format!(
                "Start date {start} is after end date {end}"
            )));
        }
        if start < today {
            warn!("Start date {} is in the past (today is {})", start, today);
            return Ok(Some(ValidationWarning::StartInPast { start, today }));
        }
        Ok(None)
    }

    /// Two distinct days that both exist
    pub fn validate_day_swap(&self, plan_id: i64, day_a: usize, day_b: usize) -> Check {
        if day_a == day_b {
            return Err(ValidationError::self_reference(format!(
                "Day {day_a} cannot be swapped with itself"
            )));
        }
        self.validate_day_exists(plan_id, day_a)?;
        self.validate_day_exists(plan_id, day_b)?;
        Ok(())
    }

    /// Two distinct places that both exist
    pub fn validate_place_swap(
        &self,
        plan_id: i64,
        day_a: usize,
        order_a: usize,
        day_b: usize,
        order_b: usize,
    ) -> Check {
        if day_a == day_b && order_a == order_b {
            return Err(ValidationError::self_reference(format!(
                "Place {order_a} on day {day_a} cannot be swapped with itself"
            )));
        }
        self.validate_place_exists(plan_id, day_a, order_a)?;
        self.validate_place_exists(plan_id, day_b, order_b)?;
        Ok(())
    }

    /// Field is on the allow-list and not on the deny-list
    pub fn validate_allowed_field_update(field: &str) -> Check {
        let key = field_key(field);
        if DENIED_FIELDS.iter().any(|f| field_key(f) == key) {
            return Err(ValidationError::field_policy(format!("Field '{field}' is immutable")));
        }
        if !ALLOWED_FIELDS.iter().any(|f| field_key(f) == key) {
            return Err(ValidationError::field_policy(format!(
                "Field '{field}' cannot be updated. Allowed fields: {}",
                ALLOWED_FIELDS.join(", ")
            )));
        }
        Ok(())
    }

    fn validate_place_name(name: &str) -> Check {
        if name.trim().is_empty() {
            return Err(ValidationError::existence("Place name cannot be empty"));
        }
        Ok(())
    }

    fn day_count(&self, plan_id: i64) -> Check<usize> {
        self.store
            .day_count(plan_id)
            .map_err(|err| store_failure(&format!("plan {plan_id}"), &err))?
            .ok_or_else(|| ValidationError::existence(format!("Plan {plan_id} does not exist")))
    }

    fn place_count(&self, plan_id: i64, day: usize) -> Check<usize> {
        self.validate_day_exists(plan_id, day)?;
        self.store
            .place_count(plan_id, day)
            .map_err(|err| store_failure(&format!("day {day} of plan {plan_id}"), &err))?
            .ok_or_else(|| {
                ValidationError::existence(format!("Day {day} does not exist in plan {plan_id}"))
            })
    }
}

/// `placeName`, `place_name` and `PLACENAME` name the same field
fn field_key(field: &str) -> String {
    field
        .trim()
        .chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

fn store_failure(what: &str, err: &crate::PlannerError) -> ValidationError {
    warn!("Plan store lookup failed for {}: {}", what, err);
    ValidationError::existence(format!("Unable to read {what}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlannerError;
    use crate::error::ValidationRule;
    use rstest::rstest;
    use std::collections::HashMap;

    /// Plan 10 owned by user 1, with three days of 3, 2 and 0 places
    struct FakeStore {
        plans: HashMap<i64, Vec<usize>>,
        fail: bool,
    }

    impl FakeStore {
        fn new() -> Self {
            Self {
                plans: HashMap::from([(10, vec![3, 2, 0])]),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }
    }

    impl PlanQuery for FakeStore {
        fn active_plan_for_user(&self, user_id: i64) -> Result<Option<PlanSnapshot>> {
            if self.fail {
                return Err(PlannerError::store("connection timed out"));
            }
            Ok((user_id == 1).then(|| PlanSnapshot {
                plan_id: 10,
                user_id,
                title: "Jeju".to_string(),
                start_date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2025, 5, 3).unwrap(),
            }))
        }

        fn day_count(&self, plan_id: i64) -> Result<Option<usize>> {
            if self.fail {
                return Err(PlannerError::store("connection timed out"));
            }
            Ok(self.plans.get(&plan_id).map(Vec::len))
        }

        fn place_count(&self, plan_id: i64, day: usize) -> Result<Option<usize>> {
            Ok(self
                .plans
                .get(&plan_id)
                .and_then(|days| days.get(day.wrapping_sub(1)))
                .copied())
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_self_swap_rejected() {
        let store = FakeStore::new();
        let validator = MutationValidator::new(&store);
        let err = validator.validate_day_swap(10, 2, 2).unwrap_err();
        assert_eq!(err.rule, ValidationRule::SelfReference);
    }

    #[test]
    fn test_day_swap_requires_existing_days() {
        let store = FakeStore::new();
        let validator = MutationValidator::new(&store);
        assert!(validator.validate_day_swap(10, 1, 3).is_ok());

        let err = validator.validate_day_swap(10, 1, 4).unwrap_err();
        assert_eq!(err.rule, ValidationRule::Existence);

        let err = validator.validate_day_swap(99, 1, 2).unwrap_err();
        assert_eq!(err.rule, ValidationRule::Existence);
    }

    #[test]
    fn test_day_index_reports_range_for_days_outside_plan() {
        let store = FakeStore::new();
        let validator = MutationValidator::new(&store);
        assert!(validator.validate_day_index(10, 2).is_ok());
        assert!(validator.validate_day_index(10, 3).is_ok());

        for day in [0, 4] {
            let err = validator.validate_day_index(10, day).unwrap_err();
            assert_eq!(err.rule, ValidationRule::Range, "day {day}");
        }

        let err = validator.validate_day_index(99, 1).unwrap_err();
        assert_eq!(err.rule, ValidationRule::Existence);
    }

    #[test]
    fn test_day_index_store_failure_is_existence() {
        let store = FakeStore::failing();
        let validator = MutationValidator::new(&store);
        let err = validator.validate_day_index(10, 1).unwrap_err();
        assert_eq!(err.rule, ValidationRule::Existence);
    }

    #[test]
    fn test_place_swap_self_reference_only_for_same_slot() {
        let store = FakeStore::new();
        let validator = MutationValidator::new(&store);
        let err = validator.validate_place_swap(10, 1, 2, 1, 2).unwrap_err();
        assert_eq!(err.rule, ValidationRule::SelfReference);

        assert!(validator.validate_place_swap(10, 1, 2, 2, 2).is_ok());
        assert!(validator.validate_place_swap(10, 1, 1, 1, 3).is_ok());
    }

    #[test]
    fn test_date_range() {
        let err = MutationValidator::validate_date_range(date(2025, 1, 10), date(2025, 1, 5))
            .unwrap_err();
        assert_eq!(err.rule, ValidationRule::Date);

        let today = date(2025, 1, 1);
        assert_eq!(
            MutationValidator::validate_date_range_at(date(2025, 1, 5), date(2025, 1, 5), today),
            Ok(None)
        );
    }

    #[test]
    fn test_past_start_is_only_a_warning() {
        let today = date(2025, 6, 1);
        let result =
            MutationValidator::validate_date_range_at(date(2025, 5, 1), date(2025, 5, 3), today);
        assert_eq!(
            result,
            Ok(Some(ValidationWarning::StartInPast {
                start: date(2025, 5, 1),
                today
            }))
        );
    }

    #[rstest]
    #[case("placeName")]
    #[case("address")]
    #[case("startTime")]
    #[case("cost")]
    #[case("title")]
    #[case("place_name")]
    fn test_allowed_fields_pass(#[case] field: &str) {
        assert!(MutationValidator::validate_allowed_field_update(field).is_ok());
    }

    #[rstest]
    #[case("userId")]
    #[case("id")]
    #[case("createdAt")]
    #[case("parentPlanId")]
    #[case("user_id")]
    #[case("nickname")]
    fn test_denied_or_unknown_fields_rejected(#[case] field: &str) {
        let err = MutationValidator::validate_allowed_field_update(field).unwrap_err();
        assert_eq!(err.rule, ValidationRule::FieldPolicy);
    }

    #[test]
    fn test_place_order_range() {
        let store = FakeStore::new();
        let validator = MutationValidator::new(&store);
        assert!(validator.validate_place_order(10, 1, 3).is_ok());
        assert_eq!(
            validator.validate_place_order(10, 1, 4).unwrap_err().rule,
            ValidationRule::Range
        );
        assert_eq!(
            validator.validate_place_order(10, 3, 1).unwrap_err().rule,
            ValidationRule::Range
        );
        assert!(validator.validate_insert_position(10, 3, 1).is_ok());
        assert!(MutationValidator::validate_day_range(0, 1, 3).is_err());
    }

    #[test]
    fn test_store_failure_is_a_rejection() {
        let store = FakeStore::failing();
        let validator = MutationValidator::new(&store);
        let outcome = validator.validate_command(1, &EditCommand::SwapDays { day_a: 1, day_b: 2 });
        assert_eq!(outcome.rejection().unwrap().rule, ValidationRule::Existence);
    }

    #[test]
    fn test_validate_command_dispatch() {
        let store = FakeStore::new();
        let validator = MutationValidator::new(&store);

        let delete = EditCommand::DeletePlace { day: 2, place_order: 2 };
        assert!(validator.validate_command(1, &delete).is_accepted());

        let no_plan = validator.validate_command(2, &delete);
        assert_eq!(no_plan.rejection().unwrap().rule, ValidationRule::Existence);

        let update = EditCommand::UpdateField {
            day: 1,
            place_order: 1,
            field: "userId".to_string(),
            value: serde_json::json!(42),
        };
        assert_eq!(
            validator.validate_command(1, &update).rejection().unwrap().rule,
            ValidationRule::FieldPolicy
        );

        let reschedule = EditCommand::Reschedule {
            start: date(2025, 1, 10),
            end: date(2025, 1, 5),
        };
        assert_eq!(
            validator.validate_command(1, &reschedule).rejection().unwrap().rule,
            ValidationRule::Date
        );

        let replace = EditCommand::ReplacePlace {
            day: 1,
            place_order: 3,
            new_place_name: "성산일출봉".to_string(),
        };
        assert!(validator.validate_command(1, &replace).is_accepted());
    }
}
