//! Prelude module for the academic_year crate.
//!
//! Re-exports the derive_more macros used across the crate.

pub use derive_more::Display;
