//! Card system: turn-order assistants and expert special cards.
//!
//! ## Key Types
//!
//! - `Assistant`: A turn-order card (value 1-10, marker steps)
//! - `CharacterKind`: Tag of a special card kind
//! - `CharacterSpec`: Static data of a kind (base cost, reservoirs, manifest)
//! - `SpecialCard`: A special card in play (current cost, reservoirs)

pub mod assistant;
pub mod definition;
pub mod instance;

pub use assistant::Assistant;
pub use definition::{CharacterKind, CharacterSpec};
pub use instance::SpecialCard;
