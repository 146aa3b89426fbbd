//! Board entities: per-player boards and the shared ring of islands.
//!
//! - `Board`: a player's entrance (staging), hall (settled) and tower reserve
//! - `Island`: a territory group on the circular shared board
//!
//! Both are plain data. All rule logic lives in `rules`.

mod island;
mod school;

pub use island::Island;
pub use school::Board;
