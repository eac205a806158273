//! `ledgerly-core`: identifiers and the domain error type shared by every crate.
//!
//! Pure domain primitives only (no infrastructure concerns).

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{AccountId, MovementId};
