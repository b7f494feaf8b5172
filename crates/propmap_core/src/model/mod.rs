//! Property record model.
//!
//! # Responsibility
//! - Define the canonical property record and its two variants.
//! - Derive description and variant metric exactly once, at construction.
//!
//! # Invariants
//! - Every record is identified by a stable `PropertyId`.
//! - Derived fields are never recomputed on a live record.

pub mod property;
