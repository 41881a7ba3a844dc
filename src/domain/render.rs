//! Text rendering of the forest for terminals.

use generational_arena::Index;
use termtree::Tree;

use crate::domain::arena::Forest;

pub trait TreeDisplay {
    /// One rendered tree per root, roots in order.
    fn to_tree_string(&self) -> Vec<Tree<String>>;
}

impl TreeDisplay for Forest {
    fn to_tree_string(&self) -> Vec<Tree<String>> {
        fn build_tree(forest: &Forest, idx: Index) -> Option<Tree<String>> {
            let node = forest.get_node(idx)?;
            let label = format!("{} ({})", node.data.display_title(), node.data.slug);
            let leaves: Vec<_> = node
                .children
                .iter()
                .filter_map(|&child| build_tree(forest, child))
                .collect();
            Some(Tree::new(label).with_leaves(leaves))
        }

        self.roots()
            .iter()
            .filter_map(|&root| build_tree(self, root))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ContentNode, TreeBuilder};

    #[test]
    fn given_nested_topics_when_rendering_then_children_indented_under_parent() {
        let forest = TreeBuilder::default()
            .build(vec![
                ContentNode::new("a").with_title("Alpha"),
                ContentNode::new("b").with_parent("a"),
            ])
            .unwrap();

        let trees = forest.to_tree_string();

        assert_eq!(trees.len(), 1);
        let text = trees[0].to_string();
        assert!(text.starts_with("Alpha (a)"));
        assert!(text.contains("└── b (b)"));
    }
}
