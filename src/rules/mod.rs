//! Rule operations: stateless functions over `MatchState`.
//!
//! - `turn_order`: planning and action queues, assistant legality
//! - `ownership`: type ownership, hall placement, coins
//! - `influence`: influence strategies and conquest
//! - `merge`: folding adjacent same-faction islands
//! - `victory`: end conditions and winner computation
//!
//! Every function takes the state explicitly; nothing here keeps state of
//! its own.

pub mod turn_order;
pub mod ownership;
pub mod influence;
pub mod merge;
pub mod victory;

pub use turn_order::{action_order, check_playable, planning_order, planning_start, played_this_round};
pub use ownership::{award_coin, settle, update_all, update_ownership};
pub use influence::{
    dominant_faction, faction_scores, resolve_conquest, strategy_for, Conquest, IgnoreMarkers,
    IgnoreResource, InfluenceStrategy, Standard,
};
pub use merge::{merge_candidates, merge_islands, merge_pair};
pub use victory::{compute_result, end_condition, EndCondition, MatchResult};
