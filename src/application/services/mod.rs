//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, KeyValueStore)
//! but are themselves concrete structs, not traits.

mod banner;
mod catalog;
mod cohort;
mod content;
mod snapshot;

pub use banner::BannerService;
pub use catalog::CatalogService;
pub use cohort::{CohortService, CohortStatus};
pub use content::{ContentService, TopicPage};
