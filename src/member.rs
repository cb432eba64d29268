//! Domain entity: a ranked roster member.

use std::cmp::Ordering;
use std::fmt;

/// A roster member: an immutable name and a numeric rank value.
///
/// Members are ordered and compared **by rank only**; the name takes no part
/// in ordering or equality. Two members with equal ranks are considered the
/// same position in the roster, which is what makes equal-rank inserts a
/// no-op (see [`crate::tree::BalancedIndex::insert`]).
#[derive(Debug, Clone)]
pub struct Member {
    /// Display name, not part of the order
    pub name: String,
    /// Rank value, the tree key
    pub rank: f64,
}

impl Member {
    pub fn new(name: impl Into<String>, rank: f64) -> Self {
        Self {
            name: name.into(),
            rank,
        }
    }
}

/// Wire format: `<name> <rank>` with exactly three decimal places.
impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.3}", self.name, self.rank)
    }
}

impl PartialEq for Member {
    fn eq(&self, other: &Self) -> bool {
        self.rank.total_cmp(&other.rank) == Ordering::Equal
    }
}

impl Eq for Member {}

impl PartialOrd for Member {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// total_cmp gives a total order over f64, so NaN ranks cannot poison the
// tree's ordering invariant.
impl Ord for Member {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank.total_cmp(&other.rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_members_with_equal_ranks_when_comparing_then_names_are_ignored() {
        let a = Member::new("Alpha", 40.0);
        let b = Member::new("Bravo", 40.0);
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);
    }

    #[test]
    fn given_members_when_comparing_then_order_follows_rank() {
        let low = Member::new("Low", 10.0);
        let high = Member::new("High", 20.5);
        assert!(low < high);
        assert!(high > low);
    }

    #[test]
    fn given_member_when_displayed_then_rank_has_three_decimals() {
        let m = Member::new("Alpha", 42.5);
        assert_eq!(m.to_string(), "Alpha 42.500");
    }
}
