//! Structured edit commands produced by the intent layer

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// An edit to an existing plan. Days and place orders are 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EditCommand {
    DeletePlace {
        day: usize,
        place_order: usize,
    },
    AddPlace {
        day: usize,
        position: usize,
        place_name: String,
    },
    ReplacePlace {
        day: usize,
        place_order: usize,
        new_place_name: String,
    },
    SwapDays {
        day_a: usize,
        day_b: usize,
    },
    SwapPlaces {
        day_a: usize,
        order_a: usize,
        day_b: usize,
        order_b: usize,
    },
    UpdateField {
        day: usize,
        place_order: usize,
        field: String,
        value: serde_json::Value,
    },
    Reschedule {
        start: NaiveDate,
        end: NaiveDate,
    },
}

impl EditCommand {
    /// Short operation name for logs
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            EditCommand::DeletePlace { .. } => "delete_place",
            EditCommand::AddPlace { .. } => "add_place",
            EditCommand::ReplacePlace { .. } => "replace_place",
            EditCommand::SwapDays { .. } => "swap_days",
            EditCommand::SwapPlaces { .. } => "swap_places",
            EditCommand::UpdateField { .. } => "update_field",
            EditCommand::Reschedule { .. } => "reschedule",
        }
    }
}

/// Result of validating a command; never partially applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationOutcome {
    Accepted,
    Rejected(ValidationError),
}

impl ValidationOutcome {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted)
    }

    /// The rejection, if any
    #[must_use]
    pub fn rejection(&self) -> Option<&ValidationError> {
        match self {
            ValidationOutcome::Accepted => None,
            ValidationOutcome::Rejected(err) => Some(err),
        }
    }

    pub fn into_result(self) -> Result<(), ValidationError> {
        match self {
            ValidationOutcome::Accepted => Ok(()),
            ValidationOutcome::Rejected(err) => Err(err),
        }
    }
}

impl<T> From<Result<T, ValidationError>> for ValidationOutcome {
    fn from(result: Result<T, ValidationError>) -> Self {
        match result {
            Ok(_) => ValidationOutcome::Accepted,
            Err(err) => ValidationOutcome::Rejected(err),
        }
    }
}
