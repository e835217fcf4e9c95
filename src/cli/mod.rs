//! CLI command handling

pub mod alert;

pub use alert::*;
