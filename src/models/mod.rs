//! Data models.

pub mod catalog;
pub mod chat;
pub mod config;
