//! # Repositories
//!
//! Each repository owns a clone of the pool and exposes typed operations
//! over one table.

pub mod local_storage;
