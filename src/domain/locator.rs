//! Slug lookup across a forest.

use generational_arena::Index;
use tracing::instrument;

use crate::domain::arena::{Forest, TreeNode};
use crate::domain::builder::TreeResult;
use crate::domain::error::DomainError;

impl Forest {
    /// Depth-first pre-order search; returns the first match.
    pub fn find(&self, slug: &str) -> Option<Index> {
        self.iter()
            .find(|(_, node)| node.data.slug == slug)
            .map(|(idx, _)| idx)
    }

    /// Like [`Forest::find`], but missing content is a [`DomainError::NotFound`].
    #[instrument(level = "debug", skip(self))]
    pub fn locate(&self, slug: &str) -> TreeResult<(Index, &TreeNode)> {
        self.iter()
            .find(|(_, node)| node.data.slug == slug)
            .ok_or_else(|| DomainError::NotFound(slug.to_string()))
    }
}
