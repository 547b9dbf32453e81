//! Application state containers.
//!
//! Each container is an ordinary value owned by whoever drives the UI, so
//! tests can build isolated instances. Changes are published on a
//! `tokio::sync::broadcast` channel; dropping the receiver returned by
//! `subscribe` ends the subscription.

pub mod favorites;
pub mod movie;
pub mod visitors;

/// Buffered events per store before slow receivers start lagging.
pub(crate) const EVENT_CAPACITY: usize = 64;
