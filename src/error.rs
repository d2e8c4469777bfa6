//! Error handling for SARCH operations
//!
//! This module re-exports the error type used throughout the crate. It uses
//! thiserror for the `Display` and `source` implementations.

pub use crate::common::Result;
pub use crate::common::SarchError;
