//! Cohort tracking service

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::instrument;

use crate::application::services::snapshot::read_records;
use crate::application::ApplicationResult;
use crate::domain::{Cohort, CohortProgress, DomainError, ScheduledCall};
use crate::infrastructure::traits::FileSystem;

/// Progress and next call of one cohort at a given instant.
#[derive(Debug, Clone)]
pub struct CohortStatus {
    pub cohort: Cohort,
    pub progress: CohortProgress,
    pub next_call: Option<ScheduledCall>,
}

pub struct CohortService {
    fs: Arc<dyn FileSystem>,
}

impl CohortService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    pub fn load(&self, path: &Path) -> ApplicationResult<Vec<Cohort>> {
        let cohorts: Vec<Cohort> = read_records(self.fs.as_ref(), path, "cohorts")?;
        for cohort in &cohorts {
            cohort.validate()?;
        }
        Ok(cohorts)
    }

    /// Status of every cohort, or of the one named `name`.
    #[instrument(level = "debug", skip(self))]
    pub fn status(
        &self,
        path: &Path,
        name: Option<&str>,
        now: DateTime<Utc>,
    ) -> ApplicationResult<Vec<CohortStatus>> {
        let cohorts = self.load(path)?;
        let selected: Vec<Cohort> = match name {
            Some(name) => {
                let cohort = cohorts
                    .into_iter()
                    .find(|c| c.name.eq_ignore_ascii_case(name))
                    .ok_or_else(|| DomainError::NotFound(name.to_string()))?;
                vec![cohort]
            }
            None => cohorts,
        };

        Ok(selected
            .into_iter()
            .map(|cohort| CohortStatus {
                progress: cohort.progress(now),
                next_call: cohort.next_call(now),
                cohort,
            })
            .collect())
    }
}
