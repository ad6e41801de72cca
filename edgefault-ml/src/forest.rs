//! Random forest scoring
//!
//! The forest averages the leaf probabilities of its trees. Inputs are
//! standardized on demand: a feature is only normalized when a split on the
//! decision path asks for it, so wide feature vectors with shallow trees
//! stay cheap.

use crate::{
    scoring::Score,
    standardize::Standardizer,
    tree::{validate_arena, Tree},
    Node,
};
use edgefault_core::errors::{ConfigError, ConfigResult};

/// Forest of probability trees over a shared node arena
#[derive(Debug, Clone, Copy)]
pub struct ForestModel<'a> {
    scaler: Standardizer<'a>,
    roots: &'a [u16],
    nodes: &'a [Node],
}

impl<'a> ForestModel<'a> {
    /// Build and validate a forest
    ///
    /// `roots[t]` is the arena index of tree `t`'s root.
    pub fn new(scaler: Standardizer<'a>, roots: &'a [u16], nodes: &'a [Node]) -> ConfigResult<Self> {
        let forest = Self { scaler, roots, nodes };
        forest.validate()?;
        Ok(forest)
    }

    pub fn feature_count(&self) -> usize {
        self.scaler.len()
    }

    pub fn tree_count(&self) -> usize {
        self.roots.len()
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.scaler.validate()?;
        for &root in self.roots {
            if root as usize >= self.nodes.len() {
                return Err(ConfigError::MalformedTree {
                    node: root as usize,
                    reason: "tree root past the node arena",
                });
            }
        }
        validate_arena(self.nodes, self.feature_count())
    }

    pub fn trees(&self) -> impl Iterator<Item = Tree<'a>> + '_ {
        self.roots.iter().map(|&root| Tree::new(self.nodes, root as usize))
    }

    /// Mean tree probability
    ///
    /// A forest without trees scores 0.0.
    pub fn probability(&self, features: &[f32]) -> f32 {
        if self.roots.is_empty() {
            return 0.0;
        }
        let scaler = &self.scaler;
        let total: f32 = self
            .trees()
            .map(|tree| {
                tree.predict(|f| scaler.normalize(f, features.get(f).copied().unwrap_or(0.0)))
            })
            .sum();
        total / self.roots.len() as f32
    }

    pub fn score(&self, features: &[f32]) -> Score {
        Score::probability(self.probability(features))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Label;

    const MEAN: [f32; 2] = [0.0, 10.0];
    const SCALE: [f32; 2] = [1.0, 2.0];

    // Two stumps: tree 0 splits on feature 0, tree 1 on feature 1
    const NODES: [Node; 6] = [
        Node::split(0, 0.0, 1, 2),
        Node::leaf(0.1),
        Node::leaf(0.7),
        Node::split(1, 0.0, 4, 5),
        Node::leaf(0.3),
        Node::leaf(0.9),
    ];
    const ROOTS: [u16; 2] = [0, 3];

    fn forest() -> ForestModel<'static> {
        ForestModel::new(Standardizer::new(&MEAN, &SCALE), &ROOTS, &NODES).unwrap()
    }

    #[test]
    fn averages_tree_probabilities() {
        // feature 0 right (0.7), feature 1 standardizes to -1, left (0.3)
        let score = forest().score(&[1.0, 8.0]);
        assert!((score.value - 0.5).abs() < 1e-6);
        assert_eq!(score.label, Label::Fault);
    }

    #[test]
    fn below_half_is_normal() {
        let score = forest().score(&[-1.0, 8.0]);
        assert!((score.value - 0.2).abs() < 1e-6);
        assert_eq!(score.label, Label::Normal);
    }

    #[test]
    fn standardized_value_is_compared() {
        // Raw 10.0 sits exactly on the mean, so z = 0 goes left
        assert!((forest().probability(&[1.0, 10.0]) - 0.5).abs() < 1e-6);
        assert!((forest().probability(&[1.0, 10.5]) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn empty_forest_scores_zero() {
        let forest = ForestModel::new(Standardizer::new(&MEAN, &SCALE), &[], &[]).unwrap();
        let score = forest.score(&[5.0, 5.0]);
        assert_eq!(score.value, 0.0);
        assert_eq!(score.label, Label::Normal);
    }

    #[test]
    fn root_outside_arena_rejected() {
        let err = ForestModel::new(Standardizer::new(&MEAN, &SCALE), &[0, 6], &NODES).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedTree { node: 6, .. }));
    }

    #[test]
    fn split_on_unknown_feature_rejected() {
        let nodes = [Node::split(2, 0.0, 1, 2), Node::leaf(0.0), Node::leaf(1.0)];
        let err = ForestModel::new(Standardizer::new(&MEAN, &SCALE), &[0], &nodes).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedTree { node: 0, .. }));
    }
}
