//! Read-only tree-shape analytics over a [`BalancedIndex`].
//!
//! All four operations walk the tree's shape rather than just its ordering;
//! none of them mutate.

use generational_arena::Index;
use tracing::instrument;

use crate::errors::{TreeError, TreeResult};
use crate::member::Member;
use crate::tree::{BalancedIndex, InOrderIter};

/// Analytical queries borrowed over the index.
pub struct RankAnalytics<'a> {
    index: &'a BalancedIndex,
}

impl<'a> RankAnalytics<'a> {
    pub fn new(index: &'a BalancedIndex) -> Self {
        Self { index }
    }

    /// Deepest node from which both `x` and `y` are reachable by ordinary
    /// descending search.
    ///
    /// This is a common ancestor under BST order, not necessarily the
    /// tightest structural LCA. The recursion prefers a deeper satisfying
    /// node, left subtree first. Fails with [`TreeError::NotFound`] when no
    /// node satisfies the property, which includes either key being absent.
    #[instrument(level = "debug", skip(self))]
    pub fn dual_containment(&self, x: &Member, y: &Member) -> TreeResult<Member> {
        self.dual_at(self.index.root(), x, y)
            .map(|idx| self.index.node(idx).member.clone())
            .ok_or_else(|| TreeError::NotFound(format!("{x} and {y}")))
    }

    fn dual_at(&self, node: Option<Index>, x: &Member, y: &Member) -> Option<Index> {
        let idx = node?;
        if !self.index.contains_from(Some(idx), x) || !self.index.contains_from(Some(idx), y) {
            return None;
        }
        let here = self.index.node(idx);
        self.dual_at(here.left, x, y)
            .or_else(|| self.dual_at(here.right, x, y))
            .or(Some(idx))
    }

    /// Number of maximal fringe units in the leaf-closure partition.
    ///
    /// Post-order fold: a leaf is an included unit; an internal node becomes
    /// an included unit only if neither of its children was included, and
    /// then adds one to the sum of its children's unit counts. An absent
    /// child counts as nothing included. Empty tree folds to 0.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_closure_partition(&self) -> usize {
        let (_, units) = self.fold(self.index.root());
        units
    }

    fn fold(&self, node: Option<Index>) -> (bool, usize) {
        let idx = match node {
            Some(idx) => idx,
            None => return (false, 0),
        };
        let here = self.index.node(idx);
        if here.left.is_none() && here.right.is_none() {
            return (true, 1);
        }
        let (left_included, left_units) = self.fold(here.left);
        let (right_included, right_units) = self.fold(here.right);
        if !left_included && !right_included {
            (true, left_units + right_units + 1)
        } else {
            (false, left_units + right_units)
        }
    }

    /// Every member at the same depth as `target`, in left-to-right order.
    ///
    /// Depth counts edges from the root; the root is at depth 0. The result
    /// always contains `target` itself. Fails with [`TreeError::NotFound`]
    /// when the target rank is absent, since its depth is undefined.
    #[instrument(level = "debug", skip(self))]
    pub fn same_depth_siblings(&self, target: &Member) -> TreeResult<Vec<Member>> {
        let depth = self
            .depth_of(target)
            .ok_or_else(|| TreeError::NotFound(target.to_string()))?;
        let mut peers = Vec::new();
        self.collect_at_depth(self.index.root(), depth, &mut peers);
        Ok(peers)
    }

    fn depth_of(&self, target: &Member) -> Option<usize> {
        let mut node = self.index.root();
        let mut depth = 0;
        while let Some(idx) = node {
            let here = self.index.node(idx);
            match target.cmp(&here.member) {
                std::cmp::Ordering::Less => node = here.left,
                std::cmp::Ordering::Greater => node = here.right,
                std::cmp::Ordering::Equal => return Some(depth),
            }
            depth += 1;
        }
        None
    }

    fn collect_at_depth(&self, node: Option<Index>, remaining: usize, peers: &mut Vec<Member>) {
        let Some(idx) = node else { return };
        let here = self.index.node(idx);
        if remaining == 0 {
            peers.push(here.member.clone());
            return;
        }
        self.collect_at_depth(here.left, remaining - 1, peers);
        self.collect_at_depth(here.right, remaining - 1, peers);
    }

    /// Ascending-rank dump, lazy and restartable. Diagnostics only.
    pub fn in_order_dump(&self) -> InOrderIter<'a> {
        self.index.in_order()
    }
}
