//! Shared error taxonomy.

pub mod error;
