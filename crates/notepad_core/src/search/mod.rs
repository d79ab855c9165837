//! Note list filtering.
//!
//! # Responsibility
//! - Provide full-scan filtering over the in-memory note set.
//! - Keep matching rules in one place for every front-end.

pub mod filter;
