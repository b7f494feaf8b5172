//! Use-case orchestration.
//!
//! # Responsibility
//! - Compose store, persistence and views behind UI-event entry points.
//! - Keep presentation collaborators decoupled from storage details.

pub mod session;
