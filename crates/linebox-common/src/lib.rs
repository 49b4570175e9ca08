//! Common utilities for the linebox engine.
//!
//! This crate provides shared infrastructure used by the layout, paint and
//! render crates:
//! - **Warning System** - deduplicated, colored terminal output for inputs
//!   that are degraded rather than rejected

pub mod warning;
