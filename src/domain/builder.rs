//! Tree builder turning a flat list of content nodes into an ordered forest.

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument};

use crate::domain::arena::Forest;
use crate::domain::entities::ContentNode;
use crate::domain::error::DomainError;

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;

/// Constructs an ordered forest from content nodes.
///
/// Nodes whose parent slug does not resolve are promoted to roots.
/// Sibling groups are sorted by `order`, ties keep input order.
pub struct TreeBuilder {
    children_by_parent: HashMap<String, Vec<usize>>,
    roots: Vec<usize>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            children_by_parent: HashMap::new(),
            roots: Vec::new(),
        }
    }

    /// Build the forest. Fails on duplicate slugs and on parent cycles.
    #[instrument(level = "debug", skip(self, nodes), fields(count = nodes.len()))]
    pub fn build(&mut self, nodes: Vec<ContentNode>) -> TreeResult<Forest> {
        // Reset state for fresh build
        self.children_by_parent.clear();
        self.roots.clear();

        let mut known: HashSet<&str> = HashSet::with_capacity(nodes.len());
        for node in &nodes {
            if !known.insert(node.slug.as_str()) {
                return Err(DomainError::DuplicateSlug(node.slug.clone()));
            }
        }

        self.group_by_parent(&nodes, &known);
        self.sort_groups(&nodes);

        let mut slots: Vec<Option<ContentNode>> = nodes.into_iter().map(Some).collect();
        let forest = self.assemble(&mut slots);

        // Anything still unplaced hangs off a parent chain that never reaches a root
        if let Some(stranded) = slots.into_iter().flatten().next() {
            return Err(DomainError::CycleDetected(stranded.slug));
        }

        debug!(
            "built forest: {} nodes, {} roots",
            forest.len(),
            forest.roots().len()
        );
        Ok(forest)
    }

    fn group_by_parent(&mut self, nodes: &[ContentNode], known: &HashSet<&str>) {
        for (position, node) in nodes.iter().enumerate() {
            match node.parent.as_deref() {
                Some(parent) if known.contains(parent) => {
                    self.children_by_parent
                        .entry(parent.to_string())
                        .or_default()
                        .push(position);
                }
                Some(parent) => {
                    debug!("orphan {} (parent {} missing), promoted to root", node.slug, parent);
                    self.roots.push(position);
                }
                None => self.roots.push(position),
            }
        }
    }

    fn sort_groups(&mut self, nodes: &[ContentNode]) {
        // sort_by_key is stable: equal orders keep input order
        self.roots.sort_by_key(|&position| nodes[position].order);
        for group in self.children_by_parent.values_mut() {
            group.sort_by_key(|&position| nodes[position].order);
        }
    }

    fn assemble(&self, slots: &mut [Option<ContentNode>]) -> Forest {
        let mut forest = Forest::new();
        let mut stack: Vec<_> = self.roots.iter().rev().map(|&p| (p, None)).collect();

        while let Some((position, parent_idx)) = stack.pop() {
            // Each position sits in exactly one group, so it is taken at most once
            let Some(node) = slots[position].take() else {
                continue;
            };

            let slug = node.slug.clone();
            let current_idx = forest.insert_node(node, parent_idx);

            // Push in reverse so the lowest order is inserted first
            if let Some(children) = self.children_by_parent.get(&slug) {
                for &child in children.iter().rev() {
                    stack.push((child, Some(current_idx)));
                }
            }
        }

        forest
    }
}
