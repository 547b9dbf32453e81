//! Key-value storage bridge.
//!
//! Two scopes are provided:
//! - [`FileStore`]: persistent, survives restarts (local storage)
//! - [`MemoryStore`]: lives as long as the process (session storage)

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::Result;

/// Storage key holding the favorites list.
pub const FAVORITES_KEY: &str = "favorites";

/// Session storage key holding the visitor count.
pub const VISITORS_KEY: &str = "visitorsCount";

/// Storage key holding the signed-in session.
pub const SESSION_KEY: &str = "session";

/// String-keyed storage of string values.
pub trait KeyValueStore {
    /// Read a value.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Delete a value.
    fn remove(&mut self, key: &str) -> Result<()>;
}
