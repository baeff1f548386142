//! Command Center sessions.
//!
//! - `engine`: per-terminal state machine (idle / executing)
//! - `backend`: the execution collaborator port
//! - `builtin`: help, ls, cat, clear
//! - `history`: bounded input history with navigation
//! - `completion`: filename completion

pub mod backend;
pub mod builtin;
pub mod completion;
pub mod engine;
pub mod history;

pub use backend::{CLEAR_SENTINEL, ExecutionBackend, ExecutionOutput, ExecutionRequest};
pub use engine::{SessionEngine, SessionOptions, SubmitOutcome};
