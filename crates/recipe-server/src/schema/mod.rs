//! API schema types for request/response definitions.
//!
//! Each sub-module defines the request and response types for a specific
//! API domain. Field names are camelCase on the wire.

pub mod common;
pub mod ingredients;
pub mod recipes;
