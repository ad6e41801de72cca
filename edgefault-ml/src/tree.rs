//! Decision tree traversal
//!
//! A [`Tree`] is a root index into a node arena shared by the whole forest.
//! Arenas are checked once with [`validate_arena`]; after that every walk is
//! guaranteed to terminate on a leaf because each child index is strictly
//! greater than its parent's.

use crate::node::Node;
use edgefault_core::errors::{ConfigError, ConfigResult};

/// Check every node of an arena against the feature count
///
/// Rejects children past the arena, children that do not come after their
/// parent, and split features the model does not have.
pub fn validate_arena(nodes: &[Node], n_features: usize) -> ConfigResult<()> {
    for (index, node) in nodes.iter().enumerate() {
        if let Node::Split { feature, left, right, .. } = *node {
            if feature as usize >= n_features {
                return Err(ConfigError::MalformedTree {
                    node: index,
                    reason: "split on a feature the model does not have",
                });
            }
            for child in [left as usize, right as usize] {
                if child >= nodes.len() {
                    return Err(ConfigError::MalformedTree {
                        node: index,
                        reason: "child index past the node arena",
                    });
                }
                if child <= index {
                    return Err(ConfigError::MalformedTree {
                        node: index,
                        reason: "child does not follow its parent",
                    });
                }
            }
        }
    }
    Ok(())
}

/// One tree of a forest
#[derive(Debug, Clone, Copy)]
pub struct Tree<'a> {
    nodes: &'a [Node],
    root: usize,
}

impl<'a> Tree<'a> {
    pub const fn new(nodes: &'a [Node], root: usize) -> Self {
        Self { nodes, root }
    }

    pub fn root(&self) -> usize {
        self.root
    }

    /// Leaf value reached by the input
    ///
    /// `feature(i)` yields the standardized value of feature `i`; only the
    /// features on the decision path are requested.
    pub fn predict<F: FnMut(usize) -> f32>(&self, mut feature: F) -> f32 {
        let mut index = self.root;
        loop {
            match self.nodes.get(index) {
                Some(Node::Leaf { value }) => return *value,
                Some(Node::Split { feature: f, threshold, left, right }) => {
                    index = if feature(*f as usize) <= *threshold {
                        *left as usize
                    } else {
                        *right as usize
                    };
                }
                // Unreachable for validated arenas
                None => return 0.0,
            }
        }
    }

    /// Longest root-to-leaf path, in edges
    pub fn depth(&self) -> usize {
        self.depth_from(self.root)
    }

    fn depth_from(&self, index: usize) -> usize {
        match self.nodes.get(index) {
            Some(Node::Split { left, right, .. }) => {
                1 + self.depth_from(*left as usize).max(self.depth_from(*right as usize))
            }
            _ => 0,
        }
    }
}
