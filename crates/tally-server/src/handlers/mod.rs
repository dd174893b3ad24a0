//! HTTP request handlers organized by operation
//!
//! Each submodule contains the handler for one API route.

pub mod ask;
pub mod categorize;
pub mod insights;
pub mod status;

// Re-export all handlers for use in router
pub use ask::*;
pub use categorize::*;
pub use insights::*;
pub use status::*;
