//! Command implementations.

pub mod package;
