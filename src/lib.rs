//! AVL-balanced member roster with rank analytics.
//!
//! The roster is a height-balanced binary search tree keyed by member rank
//! ([`tree::BalancedIndex`]), with four read-only shape analytics layered on
//! top ([`analytics::RankAnalytics`]). Commands arrive as text lines through
//! the [`script`] protocol; the [`cli`] wires script files to the session
//! loop.

pub mod analytics;
pub mod cli;
pub mod errors;
pub mod exitcode;
pub mod member;
pub mod script;
pub mod tree;
pub mod util;
