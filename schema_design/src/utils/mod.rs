//! Utilities for schema_design
//!
//! This module provides utility functions used across the library.

pub mod logging;
pub mod naming;

// Re-export key utility functions
pub use naming::{
    foreign_key_constraint_name, generate_unique_name, lookup_table_name, pluralize,
};
