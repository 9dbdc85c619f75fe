//! Common utilities for the sprig selector engine.
//!
//! This crate provides shared infrastructure used by all sprig components:
//! - **Warning System** - colored, deduplicated diagnostics on stderr

pub mod warning;
