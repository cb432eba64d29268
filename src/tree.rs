//! Arena-backed AVL tree over ranked members.
//!
//! The tree owns all nodes in a generational arena; child links are plain
//! arena indices and are rewired only inside the insert/remove/balance
//! protocol. Heights are cached per node and recomputed bottom-up after
//! every structural change.

use std::cmp::Ordering;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::errors::{TreeError, TreeResult};
use crate::member::Member;

/// Maximum tolerated height difference between siblings.
const ALLOWED_IMBALANCE: i32 = 1;

/// Tree node: payload plus cached subtree height.
#[derive(Debug)]
pub(crate) struct RankNode {
    pub(crate) member: Member,
    pub(crate) left: Option<Index>,
    pub(crate) right: Option<Index>,
    /// `1 + max(height(left), height(right))`; a missing child counts as -1
    pub(crate) height: i32,
}

impl RankNode {
    fn new(member: Member) -> Self {
        Self {
            member,
            left: None,
            right: None,
            height: 0,
        }
    }
}

/// Record of one successful removal.
///
/// `successor` is the member that took the leaver's structural place: the
/// right-subtree minimum when the node had two children, the lone child when
/// it had one, `None` when it was a leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct Departure {
    pub leaver: Member,
    pub successor: Option<Member>,
}

/// Height-balanced binary search index keyed by member rank.
///
/// In-order traversal yields members in strictly ascending rank order, and
/// after every mutating call each node's children differ in height by at
/// most one. Equal-rank inserts are structural no-ops: rank uniqueness is a
/// deliberate policy, not an accident of comparison.
#[derive(Debug)]
pub struct BalancedIndex {
    arena: Arena<RankNode>,
    root: Option<Index>,
}

impl Default for BalancedIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl BalancedIndex {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of members in the roster.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Height of the whole tree, -1 when empty.
    pub fn height(&self) -> i32 {
        self.height_of(self.root)
    }

    /// The current head of the roster, if any.
    pub fn root_member(&self) -> Option<&Member> {
        self.root.map(|idx| &self.arena[idx].member)
    }

    pub(crate) fn root(&self) -> Option<Index> {
        self.root
    }

    pub(crate) fn node(&self, idx: Index) -> &RankNode {
        &self.arena[idx]
    }

    /// Inserts a member by descending rank comparison and rebalances every
    /// ancestor on the way back up.
    ///
    /// Returns the greeting path: the member at every existing node visited
    /// on the way down, in path order. Inserting an already-present rank
    /// changes nothing structurally (the path is still reported) and the
    /// incoming member's name is discarded.
    #[instrument(level = "debug", skip(self))]
    pub fn insert(&mut self, member: Member) -> Vec<Member> {
        let mut greeters = Vec::new();
        let new_root = self.insert_at(self.root, member, &mut greeters);
        self.root = Some(new_root);
        greeters
    }

    fn insert_at(&mut self, node: Option<Index>, member: Member, greeters: &mut Vec<Member>) -> Index {
        let Some(idx) = node else {
            return self.arena.insert(RankNode::new(member));
        };
        greeters.push(self.arena[idx].member.clone());
        match member.cmp(&self.arena[idx].member) {
            Ordering::Less => {
                let new_left = self.insert_at(self.arena[idx].left, member, greeters);
                self.arena[idx].left = Some(new_left);
            }
            Ordering::Greater => {
                let new_right = self.insert_at(self.arena[idx].right, member, greeters);
                self.arena[idx].right = Some(new_right);
            }
            Ordering::Equal => {} // rank already present
        }
        self.balance(idx)
    }

    /// Removes the member with this rank, if present.
    ///
    /// Returns the single [`Departure`] on success, `None` when the rank is
    /// absent. Every node on the search path is rebalanced on return.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, member: &Member) -> Option<Departure> {
        let mut departure = None;
        self.root = self.remove_at(self.root, member, &mut departure);
        departure
    }

    fn remove_at(
        &mut self,
        node: Option<Index>,
        target: &Member,
        departure: &mut Option<Departure>,
    ) -> Option<Index> {
        let idx = node?;
        match target.cmp(&self.arena[idx].member) {
            Ordering::Less => {
                let new_left = self.remove_at(self.arena[idx].left, target, departure);
                self.arena[idx].left = new_left;
            }
            Ordering::Greater => {
                let new_right = self.remove_at(self.arena[idx].right, target, departure);
                self.arena[idx].right = new_right;
            }
            Ordering::Equal => return self.detach(idx, departure),
        }
        Some(self.balance(idx))
    }

    /// Unlinks a found node, recording its departure.
    ///
    /// The two-children case runs in two phases: the payload is replaced by
    /// the right-subtree minimum, then that minimum's old slot is deleted
    /// from the right subtree by its newly assigned key via [`Self::delete_exact`],
    /// which emits no event of its own.
    fn detach(&mut self, idx: Index, departure: &mut Option<Departure>) -> Option<Index> {
        match (self.arena[idx].left, self.arena[idx].right) {
            (Some(_), Some(right)) => {
                let successor = self.arena[self.min_node(right)].member.clone();
                *departure = Some(Departure {
                    leaver: self.arena[idx].member.clone(),
                    successor: Some(successor.clone()),
                });
                self.arena[idx].member = successor.clone();
                let new_right = self.delete_exact(Some(right), &successor);
                self.arena[idx].right = new_right;
                Some(self.balance(idx))
            }
            (Some(child), None) | (None, Some(child)) => {
                if let Some(node) = self.arena.remove(idx) {
                    *departure = Some(Departure {
                        leaver: node.member,
                        successor: Some(self.arena[child].member.clone()),
                    });
                }
                Some(self.balance(child))
            }
            (None, None) => {
                if let Some(node) = self.arena.remove(idx) {
                    *departure = Some(Departure {
                        leaver: node.member,
                        successor: None,
                    });
                }
                None
            }
        }
    }

    /// Structural deletion by exact rank key, no event reporting.
    fn delete_exact(&mut self, node: Option<Index>, target: &Member) -> Option<Index> {
        let idx = node?;
        match target.cmp(&self.arena[idx].member) {
            Ordering::Less => {
                let new_left = self.delete_exact(self.arena[idx].left, target);
                self.arena[idx].left = new_left;
            }
            Ordering::Greater => {
                let new_right = self.delete_exact(self.arena[idx].right, target);
                self.arena[idx].right = new_right;
            }
            Ordering::Equal => match (self.arena[idx].left, self.arena[idx].right) {
                (Some(_), Some(right)) => {
                    let successor = self.arena[self.min_node(right)].member.clone();
                    self.arena[idx].member = successor.clone();
                    let new_right = self.delete_exact(Some(right), &successor);
                    self.arena[idx].right = new_right;
                }
                (Some(child), None) | (None, Some(child)) => {
                    self.arena.remove(idx);
                    return Some(self.balance(child));
                }
                (None, None) => {
                    self.arena.remove(idx);
                    return None;
                }
            },
        }
        Some(self.balance(idx))
    }

    /// Descending search by rank, O(height).
    #[instrument(level = "trace", skip(self))]
    pub fn contains(&self, member: &Member) -> bool {
        self.contains_from(self.root, member)
    }

    pub(crate) fn contains_from(&self, node: Option<Index>, member: &Member) -> bool {
        let mut current = node;
        while let Some(idx) = current {
            match member.cmp(&self.arena[idx].member) {
                Ordering::Less => current = self.arena[idx].left,
                Ordering::Greater => current = self.arena[idx].right,
                Ordering::Equal => return true,
            }
        }
        false
    }

    /// Lowest-ranked member.
    pub fn find_min(&self) -> TreeResult<&Member> {
        let root = self.root.ok_or(TreeError::EmptyTree)?;
        Ok(&self.arena[self.min_node(root)].member)
    }

    /// Highest-ranked member.
    pub fn find_max(&self) -> TreeResult<&Member> {
        let root = self.root.ok_or(TreeError::EmptyTree)?;
        let mut idx = root;
        while let Some(right) = self.arena[idx].right {
            idx = right;
        }
        Ok(&self.arena[idx].member)
    }

    fn min_node(&self, mut idx: Index) -> Index {
        while let Some(left) = self.arena[idx].left {
            idx = left;
        }
        idx
    }

    /// Lazy ascending-rank traversal; restartable by calling again.
    pub fn in_order(&self) -> InOrderIter<'_> {
        InOrderIter::new(self)
    }

    /// Diagnostic: verifies the AVL balance bound and the cached-height
    /// bookkeeping over the whole tree.
    pub fn is_height_balanced(&self) -> bool {
        self.check_height(self.root).is_some()
    }

    fn check_height(&self, node: Option<Index>) -> Option<i32> {
        let idx = match node {
            Some(idx) => idx,
            None => return Some(-1),
        };
        let left = self.check_height(self.arena[idx].left)?;
        let right = self.check_height(self.arena[idx].right)?;
        if (left - right).abs() > ALLOWED_IMBALANCE {
            return None;
        }
        let height = 1 + left.max(right);
        if height != self.arena[idx].height {
            return None;
        }
        Some(height)
    }

    fn height_of(&self, node: Option<Index>) -> i32 {
        node.map_or(-1, |idx| self.arena[idx].height)
    }

    fn child_heights(&self, node: Option<Index>) -> (i32, i32) {
        match node {
            Some(idx) => (
                self.height_of(self.arena[idx].left),
                self.height_of(self.arena[idx].right),
            ),
            None => (-1, -1),
        }
    }

    fn update_height(&mut self, idx: Index) {
        let height = 1 + self
            .height_of(self.arena[idx].left)
            .max(self.height_of(self.arena[idx].right));
        self.arena[idx].height = height;
    }

    /// Restores the balance bound at `idx` after a structural change below
    /// it and returns the new subtree root.
    ///
    /// Left-heavy with the left child's left at least as tall as its right
    /// takes a single right rotation, otherwise a left-then-right double
    /// rotation; symmetric on the right. The height cache at `idx` is
    /// refreshed even when no rotation fires.
    fn balance(&mut self, idx: Index) -> Index {
        let left = self.arena[idx].left;
        let right = self.arena[idx].right;
        let idx = if self.height_of(left) - self.height_of(right) > ALLOWED_IMBALANCE {
            let (ll, lr) = self.child_heights(left);
            if ll >= lr {
                self.rotate_right(idx)
            } else {
                self.rotate_left_then_right(idx)
            }
        } else if self.height_of(right) - self.height_of(left) > ALLOWED_IMBALANCE {
            let (rl, rr) = self.child_heights(right);
            if rr >= rl {
                self.rotate_left(idx)
            } else {
                self.rotate_right_then_left(idx)
            }
        } else {
            idx
        };
        self.update_height(idx);
        idx
    }

    // Rotations rewire only the pivot and its two relevant subtrees and
    // recompute the two affected heights bottom-up.

    fn rotate_right(&mut self, idx: Index) -> Index {
        let pivot = self.arena[idx]
            .left
            .expect("right rotation requires a left child");
        self.arena[idx].left = self.arena[pivot].right;
        self.arena[pivot].right = Some(idx);
        self.update_height(idx);
        self.update_height(pivot);
        pivot
    }

    fn rotate_left(&mut self, idx: Index) -> Index {
        let pivot = self.arena[idx]
            .right
            .expect("left rotation requires a right child");
        self.arena[idx].right = self.arena[pivot].left;
        self.arena[pivot].left = Some(idx);
        self.update_height(idx);
        self.update_height(pivot);
        pivot
    }

    fn rotate_left_then_right(&mut self, idx: Index) -> Index {
        let left = self.arena[idx]
            .left
            .expect("double rotation requires a left child");
        let new_left = self.rotate_left(left);
        self.arena[idx].left = Some(new_left);
        self.rotate_right(idx)
    }

    fn rotate_right_then_left(&mut self, idx: Index) -> Index {
        let right = self.arena[idx]
            .right
            .expect("double rotation requires a right child");
        let new_right = self.rotate_right(right);
        self.arena[idx].right = Some(new_right);
        self.rotate_left(idx)
    }
}

/// In-order iterator over the index, leftmost member first.
pub struct InOrderIter<'a> {
    tree: &'a BalancedIndex,
    stack: Vec<Index>,
}

impl<'a> InOrderIter<'a> {
    fn new(tree: &'a BalancedIndex) -> Self {
        let mut iter = Self {
            tree,
            stack: Vec::new(),
        };
        iter.push_left_spine(tree.root);
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<Index>) {
        while let Some(idx) = node {
            self.stack.push(idx);
            node = self.tree.arena[idx].left;
        }
    }
}

impl<'a> Iterator for InOrderIter<'a> {
    type Item = &'a Member;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.stack.pop()?;
        let tree = self.tree;
        let node = &tree.arena[idx];
        self.push_left_spine(node.right);
        Some(&node.member)
    }
}
