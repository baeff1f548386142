//! The forge: turns an order into a validated generated project.
//!
//! - `synthesis`: the code synthesis collaborator port
//! - `prompt`: generation instructions built from order details
//! - `validate`: structural checks on the candidate project
//! - `pipeline`: the staged run with progress reporting

pub mod pipeline;
pub mod prompt;
pub mod synthesis;
pub mod validate;

pub use pipeline::ForgePipeline;
pub use synthesis::{CodeSynthesisClient, GenerationRequest, ProjectSchema};
