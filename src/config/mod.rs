//! Configuration management
//!
//! This module handles the node's settings: who owns the node (and so
//! receives mining rewards), where state is stored, and which storage
//! backend is used.

pub mod settings;

pub use settings::{Config, StorageBackend, GLOBAL_CONFIG};
