//! Errors raised where the binary writes to disk itself

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::application::ApplicationError;

/// Service failures plus the few writes the CLI performs without a service.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// A generated file (config template) could not be written
    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl InfraError {
    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}
