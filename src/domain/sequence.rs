//! Reading-order navigation over a forest.
//!
//! Every node gets a position in one linear pre-order sequence spanning all
//! trees. `next` and `previous` resolve a neighbour lazily in O(depth)
//! without materializing that sequence.

use generational_arena::Index;

use crate::domain::arena::Forest;
use crate::domain::entities::NavLink;

/// Previous/next links for one node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigation {
    pub previous: Option<NavLink>,
    pub next: Option<NavLink>,
}

impl Forest {
    /// Sibling group the node belongs to (the root list for roots).
    pub fn siblings(&self, idx: Index) -> &[Index] {
        match self.get_node(idx).and_then(|node| node.parent) {
            Some(parent) => self
                .get_node(parent)
                .map(|p| p.children.as_slice())
                .unwrap_or_default(),
            None => self.roots(),
        }
    }

    fn sibling_position(&self, idx: Index) -> Option<(usize, &[Index])> {
        let siblings = self.siblings(idx);
        siblings
            .iter()
            .position(|&s| s == idx)
            .map(|pos| (pos, siblings))
    }

    /// First child, else next sibling, else the next sibling of the nearest ancestor that has one.
    pub fn next(&self, idx: Index) -> Option<Index> {
        let node = self.get_node(idx)?;
        if let Some(&first) = node.children.first() {
            return Some(first);
        }

        let mut current = idx;
        loop {
            let (pos, siblings) = self.sibling_position(current)?;
            if let Some(&following) = siblings.get(pos + 1) {
                return Some(following);
            }
            current = self.get_node(current)?.parent?;
        }
    }

    /// Deepest last descendant of the previous sibling, else the parent.
    pub fn previous(&self, idx: Index) -> Option<Index> {
        let (pos, siblings) = self.sibling_position(idx)?;
        if pos > 0 {
            return Some(self.last_descendant(siblings[pos - 1]));
        }
        self.get_node(idx)?.parent
    }

    fn last_descendant(&self, mut idx: Index) -> Index {
        while let Some(&last) = self.get_node(idx).and_then(|n| n.children.last()) {
            idx = last;
        }
        idx
    }

    pub fn nav_link(&self, idx: Index) -> Option<NavLink> {
        self.get_node(idx).map(|node| node.data.link())
    }

    pub fn navigation(&self, idx: Index) -> Navigation {
        Navigation {
            previous: self.previous(idx).and_then(|i| self.nav_link(i)),
            next: self.next(idx).and_then(|i| self.nav_link(i)),
        }
    }

    /// Root-to-node chain, the node itself last.
    pub fn breadcrumbs(&self, idx: Index) -> Vec<NavLink> {
        let mut chain = Vec::new();
        let mut current = Some(idx);
        while let Some(i) = current {
            let Some(node) = self.get_node(i) else {
                break;
            };
            chain.push(node.data.link());
            current = node.parent;
        }
        chain.reverse();
        chain
    }

    /// The whole reading sequence, materialized.
    pub fn reading_order(&self) -> Vec<NavLink> {
        self.iter().map(|(_, node)| node.data.link()).collect()
    }
}
