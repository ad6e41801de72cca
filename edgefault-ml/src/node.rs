//! Decision tree nodes
//!
//! Exported forests arrive as parallel flat arrays (feature, threshold,
//! left, right, leaf value) shared by every tree, with `-1` marking a
//! missing child. [`Node::from_flat`] turns one row of those arrays into a
//! typed node so traversal never has to look at sentinel values.

use edgefault_core::errors::{ConfigError, ConfigResult};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Sentinel used by the flat export for "no child"
pub const NO_CHILD: i32 = -1;

/// One node of a decision tree
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Node {
    /// Internal node: go left when `z[feature] <= threshold`
    Split {
        feature: u16,
        threshold: f32,
        /// Absolute index of the left child in the node arena
        left: u16,
        /// Absolute index of the right child in the node arena
        right: u16,
    },
    /// Terminal node carrying the fault-class probability
    Leaf {
        value: f32,
    },
}

impl Node {
    pub const fn split(feature: u16, threshold: f32, left: u16, right: u16) -> Self {
        Node::Split { feature, threshold, left, right }
    }

    pub const fn leaf(value: f32) -> Self {
        Node::Leaf { value }
    }

    /// Build a node from one row of the flat export
    ///
    /// Both children `-1` makes a leaf. A single missing child, or an index
    /// that does not fit the arena, is rejected.
    pub fn from_flat(
        index: usize,
        feature: i32,
        threshold: f32,
        left: i32,
        right: i32,
        value: f32,
    ) -> ConfigResult<Self> {
        match (left, right) {
            (NO_CHILD, NO_CHILD) => Ok(Node::leaf(value)),
            (NO_CHILD, _) | (_, NO_CHILD) => Err(ConfigError::MalformedTree {
                node: index,
                reason: "split node with a single child",
            }),
            _ => {
                let feature = u16::try_from(feature).map_err(|_| ConfigError::MalformedTree {
                    node: index,
                    reason: "feature index out of range",
                })?;
                let left = u16::try_from(left).map_err(|_| ConfigError::MalformedTree {
                    node: index,
                    reason: "left child index out of range",
                })?;
                let right = u16::try_from(right).map_err(|_| ConfigError::MalformedTree {
                    node: index,
                    reason: "right child index out of range",
                })?;
                Ok(Node::split(feature, threshold, left, right))
            }
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// Decode a whole flat export into a fixed-capacity arena
///
/// All five tables must have the same length, at most `N` rows.
pub fn decode_flat<const N: usize>(
    features: &[i32],
    thresholds: &[f32],
    left: &[i32],
    right: &[i32],
    values: &[f32],
) -> ConfigResult<heapless::Vec<Node, N>> {
    let rows = features.len();
    for (table, len) in [
        ("thresholds", thresholds.len()),
        ("left", left.len()),
        ("right", right.len()),
        ("values", values.len()),
    ] {
        if len != rows {
            return Err(ConfigError::TableLength { table, expected: rows, actual: len });
        }
    }
    if rows > N {
        return Err(ConfigError::CapacityExceeded { required: rows, limit: N });
    }

    let mut nodes = heapless::Vec::new();
    for i in 0..rows {
        let node = Node::from_flat(i, features[i], thresholds[i], left[i], right[i], values[i])?;
        // Capacity checked above
        let _ = nodes.push(node);
    }
    Ok(nodes)
}
