//! # Utilities Module
//!
//! Shared helpers for the generation passes.

pub mod random;

pub use random::*;
