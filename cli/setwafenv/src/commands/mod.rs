//! CLI command implementations.

pub mod list;
pub mod setenv;
pub mod unset;
