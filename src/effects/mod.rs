//! Special-card effects.
//!
//! - `context`: the optional inputs an effect reads, and manifest checks
//! - `exchange`: bounded all-or-nothing swaps between two containers
//! - `resolver`: the strategy table and the pay-after-success flow

mod context;
mod exchange;
mod resolver;

pub use context::{ContextField, EffectContext, Units};
pub use exchange::exchange;
pub use resolver::{transform, EffectResolver, Transform};
