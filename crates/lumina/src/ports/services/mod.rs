//! Service Ports
//!
//! Interfaces for external services the application talks to.

mod progress_mirror;

pub use progress_mirror::*;
