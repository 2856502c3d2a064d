//! Credential lifecycle over a single CSV file.
//!
//! Provides:
//! - Account registration with email + password policy checks
//! - Attempt-limited interactive login (fixed budget, then lockout)
//! - Password recovery gated on a hashed security answer
//! - CSV-backed persistent storage with atomic rewrites
//!
//! ## Design Decisions
//! - Secrets are hashed with PBKDF2-SHA256 in PHC string format, so every
//!   stored hash carries its own algorithm, rounds, and salt. Recovery
//!   answers get the same treatment as passwords.
//! - The store is re-read at every operation boundary rather than cached.
//!   A single CSV file stays small enough that correctness wins over
//!   cleverness here.
//! - Login rejections never say whether the email or the password was
//!   wrong.

pub mod error;
pub mod hasher;
pub mod policy;
pub mod service;
pub mod store;

pub use error::AuthError;
pub use service::{AuthService, LoginOutcome, LoginSession, RegisterRequest, MAX_LOGIN_ATTEMPTS};
pub use store::{CredentialRecord, CredentialStore};
