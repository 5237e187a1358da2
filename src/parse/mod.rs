//! Readers for the catalog and properties data files.

pub mod escape;
pub mod lines;
pub mod properties;
