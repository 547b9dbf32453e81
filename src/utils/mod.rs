//! Utility functions.

pub mod version;
