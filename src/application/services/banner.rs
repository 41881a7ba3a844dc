//! Dismissed-banner state
//!
//! Replaces ambient session flags with explicit state behind [`KeyValueStore`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult};
use crate::infrastructure::traits::KeyValueStore;

const KEY_PREFIX: &str = "banner.dismissed.";

pub struct BannerService {
    store: Arc<dyn KeyValueStore>,
}

impl BannerService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn key(id: &str) -> String {
        format!("{KEY_PREFIX}{}", id.trim())
    }

    /// When the banner was dismissed, if it was.
    pub fn dismissed_at(&self, id: &str) -> ApplicationResult<Option<DateTime<Utc>>> {
        let value = self.store.get(&Self::key(id)).map_err(store_err)?;
        // Unparseable timestamps still count as dismissed
        Ok(value.map(|v| {
            DateTime::parse_from_rfc3339(&v)
                .map(|t| t.with_timezone(&Utc))
                .unwrap_or_default()
        }))
    }

    pub fn is_dismissed(&self, id: &str) -> ApplicationResult<bool> {
        Ok(self.dismissed_at(id)?.is_some())
    }

    pub fn dismiss(&self, id: &str, at: DateTime<Utc>) -> ApplicationResult<()> {
        debug!("dismiss banner {}", id);
        self.store
            .set(&Self::key(id), &at.to_rfc3339())
            .map_err(store_err)
    }

    pub fn reset(&self, id: &str) -> ApplicationResult<()> {
        debug!("reset banner {}", id);
        self.store.remove(&Self::key(id)).map_err(store_err)
    }
}

fn store_err(e: std::io::Error) -> ApplicationError {
    ApplicationError::OperationFailed {
        context: "banner state".to_string(),
        source: Box::new(e),
    }
}
