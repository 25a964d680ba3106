//! Safe mutation of existing plans
//!
//! Edit commands arrive already structured. Free-text place references are
//! resolved with [`NameResolver`], then [`MutationValidator`] decides whether
//! the command may run. Execution itself belongs to the caller.

pub mod command;
pub mod name_resolver;
pub mod validator;

pub use command::{EditCommand, ValidationOutcome};
pub use name_resolver::{FuzzyMatchResult, MatchTier, NameResolver, levenshtein, normalize};
pub use validator::{
    ALLOWED_FIELDS, DENIED_FIELDS, MutationValidator, PlanQuery, ValidationWarning,
};
