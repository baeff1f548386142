//! Interactive Command Center for a forged agent.
//!
//! Wraps a core `SessionEngine` in a readline loop: plain input goes to the
//! session (built-ins or the execution backend), `/` commands drive the file
//! viewer and the session itself. Entry point: `loop_runner::run_terminal`.

pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod render;
