//! learnpath: content core of a learning site
//!
//! Builds topic trees from flat parent-linked records, resolves reading
//! order and previous/next links, filters curricula and issues, and tracks
//! cohort schedules.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
