//! Core types shared across deepeq facilities
//!
//! This crate provides foundational types used by the comparison engine,
//! its error facility and its logging facility:
//!
//! - **Correlation types**: InvocationId identifying one top-level comparison
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::InvocationId;
