//! Infrastructure layer module
//!
//! Adapters around the pure services:
//! - Environment snapshots of the process table
//! - The configuration loader and its options
//! - Figment integration

pub mod config;
pub mod env;
