//! Documentation output
//!
//! Persists a schema and everything derived from it as a bundle of files.

pub mod writer;

pub use writer::{DocumentBundle, DocumentationWriter};
