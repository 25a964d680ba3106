//! Error types and handling for the itinerary engine

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Rule violated by a rejected plan mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationRule {
    /// Referenced plan, day or place does not exist
    Existence,
    /// Index outside the bounds derived from the plan
    Range,
    /// Start date after end date
    Date,
    /// Operation targets the same day or place twice
    SelfReference,
    /// Field may not be modified
    FieldPolicy,
}

impl fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValidationRule::Existence => "existence",
            ValidationRule::Range => "range",
            ValidationRule::Date => "date",
            ValidationRule::SelfReference => "self_reference",
            ValidationRule::FieldPolicy => "field_policy",
        };
        f.write_str(name)
    }
}

/// A rejected pre-condition check
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{rule} check failed: {message}")]
pub struct ValidationError {
    pub rule: ValidationRule,
    pub message: String,
}

impl ValidationError {
    pub fn new<S: Into<String>>(rule: ValidationRule, message: S) -> Self {
        Self {
            rule,
            message: message.into(),
        }
    }

    pub fn existence<S: Into<String>>(message: S) -> Self {
        Self::new(ValidationRule::Existence, message)
    }

    pub fn range<S: Into<String>>(message: S) -> Self {
        Self::new(ValidationRule::Range, message)
    }

    pub fn date<S: Into<String>>(message: S) -> Self {
        Self::new(ValidationRule::Date, message)
    }

    pub fn self_reference<S: Into<String>>(message: S) -> Self {
        Self::new(ValidationRule::SelfReference, message)
    }

    pub fn field_policy<S: Into<String>>(message: S) -> Self {
        Self::new(ValidationRule::FieldPolicy, message)
    }
}

/// Main error type for the itinerary engine
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Rejected plan mutation
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Day lookup outside the assembled plan
    #[error("Day {day} is out of range (plan has {duration} days)")]
    DayOutOfRange { day: usize, duration: usize },

    /// Failure reported by the plan store
    #[error("Plan store error: {message}")]
    Store { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Candidate or plan (de)serialization errors
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl PlannerError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new plan store error
    pub fn store<S: Into<String>>(message: S) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            PlannerError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            PlannerError::Validation(err) => err.message.clone(),
            PlannerError::DayOutOfRange { day, duration } => {
                format!("Day {day} does not exist. The trip has {duration} days.")
            }
            PlannerError::Store { .. } => {
                "Unable to read the plan. Please try again later.".to_string()
            }
            PlannerError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            PlannerError::Json { .. } => "Input is not valid JSON.".to_string(),
        }
    }
}
