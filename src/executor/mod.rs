//! Command execution with rollback.
//!
//! - `command`: inbound commands and the broadcastable outcome
//! - `envelope`: the snapshot/execute/rollback envelope

mod command;
mod envelope;

pub use command::{Command, LastMove, Outcome, Rejection};
pub use envelope::Executor;
