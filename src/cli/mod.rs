//! CLI command implementations

pub mod build;
pub mod info;
pub mod list;
pub mod search;
pub mod validate;
