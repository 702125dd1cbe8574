//! Core data model and token generation for documentation search indexes.

pub mod model;
pub mod token;
