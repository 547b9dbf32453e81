//! Clients for external services.

pub mod catalog;
pub mod chat;
pub mod identity;
