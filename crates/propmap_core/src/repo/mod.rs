//! Storage collaborators and the snapshot persistence adapter.
//!
//! # Responsibility
//! - Define the key-value storage contract the core writes snapshots to.
//! - Provide in-memory and SQLite-backed storage implementations.
//! - Serialize/restore the ordered record collection.
//!
//! # Invariants
//! - A snapshot is always the full collection; writes overwrite, never merge.
//! - Reading a corrupt snapshot never fails the caller.

pub mod snapshot_repo;
pub mod sqlite_storage;
pub mod storage;
