//! Infrastructure implementations.
//!
//! Contains the port traits and their file-backed adapters.

pub mod persistence;
pub mod ports;
pub mod settings;
