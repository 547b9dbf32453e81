//! Toon Catalog Library
//!
//! Browse an animated-series catalog, navigate seasons and episodes, keep a
//! favorites list and talk to the hosted identity/chat service.

pub mod cli;
pub mod error;
pub mod models;
pub mod preflight;
pub mod router;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

pub use error::{Error, Result};
