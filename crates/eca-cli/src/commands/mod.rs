//! CLI command implementations

pub mod classify;
pub mod completions;
pub mod recommend;
