//! `ledgerly-auth`: identity context for the ledger.
//!
//! Verifies bearer tokens and yields the authenticated account id. Token
//! issuance and credential checks belong to the user-management service.

pub mod claims;
pub mod jwt;

pub use claims::{validate_claims, JwtClaims, TokenValidationError};
pub use jwt::{Hs256JwtValidator, JwtError, JwtValidator};
