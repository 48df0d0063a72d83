//! Core data types and structures
//!
//! This module contains the fundamental data types used throughout
//! cargo-affected, separated from their implementation logic.

pub mod types;

pub use types::*;
