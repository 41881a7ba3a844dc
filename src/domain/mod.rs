//! Domain layer: entities and content logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod filter;
pub mod locator;
pub mod markdown;
pub mod render;
pub mod schedule;
pub mod sequence;

pub use arena::{Forest, TreeNode};
pub use builder::{TreeBuilder, TreeResult};
pub use entities::*;
pub use error::{DomainError, ParseValueError};
pub use filter::{filter, FilterCriteria, Filterable, SortOrder};
pub use markdown::ContentParseError;
pub use render::TreeDisplay;
pub use schedule::{Cohort, CohortProgress, Countdown, ScheduledCall};
pub use sequence::Navigation;

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
///
/// Uses shellexpand crate for robust expansion.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
