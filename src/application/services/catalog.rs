//! Curriculum and issue catalog service

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::services::snapshot::read_records;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{filter, CurriculumItem, FilterCriteria, Issue};
use crate::infrastructure::traits::FileSystem;

/// Loads curricula and issues snapshots and runs the filter pipeline over them.
pub struct CatalogService {
    fs: Arc<dyn FileSystem>,
}

impl CatalogService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    pub fn load_curricula(&self, path: &Path) -> ApplicationResult<Vec<CurriculumItem>> {
        let items: Vec<CurriculumItem> = read_records(self.fs.as_ref(), path, "curricula")?;
        if let Some(bad) = items
            .iter()
            .find(|i| i.slug.trim().is_empty() || i.title.trim().is_empty())
        {
            return Err(ApplicationError::invalid_content(
                path,
                format!("curriculum item needs slug and title: {:?}", bad.slug),
            ));
        }
        Ok(items)
    }

    pub fn load_issues(&self, path: &Path) -> ApplicationResult<Vec<Issue>> {
        let issues: Vec<Issue> = read_records(self.fs.as_ref(), path, "issues")?;
        if let Some(bad) = issues.iter().find(|i| i.id.trim().is_empty()) {
            return Err(ApplicationError::invalid_content(
                path,
                format!("issue without id: {:?}", bad.title),
            ));
        }
        Ok(issues)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn curricula(
        &self,
        path: &Path,
        criteria: &FilterCriteria,
    ) -> ApplicationResult<Vec<CurriculumItem>> {
        let items = self.load_curricula(path)?;
        let filtered = filter(&items, criteria);
        debug!("curricula: {} of {} match", filtered.len(), items.len());
        Ok(filtered)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn issues(&self, path: &Path, criteria: &FilterCriteria) -> ApplicationResult<Vec<Issue>> {
        let issues = self.load_issues(path)?;
        let filtered = filter(&issues, criteria);
        debug!("issues: {} of {} match", filtered.len(), issues.len());
        Ok(filtered)
    }
}
