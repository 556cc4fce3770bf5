//! Core types and trait definitions for the Steady recovery store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod achievements;
pub mod error;
pub mod exercise;
pub mod journal;
pub mod sobriety;
pub mod store;
pub mod trigger;
pub mod user;

pub use error::{Error, Result};
