//! Business logic services (use cases).
//!
//! Services orchestrate the pipeline, the registry and business rules. They
//! depend on traits (ports) -- never on concrete infrastructure.

pub mod forge;

pub use forge::ForgeService;
