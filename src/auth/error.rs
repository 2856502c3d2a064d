//! Failure taxonomy for the credential core.
//!
//! One variant per caller-visible failure so the CLI can decide whether to
//! re-prompt, fall back to the menu, or abort. Store and hashing faults wrap
//! their sources; everything else is a plain rejection.

use thiserror::Error;

/// Errors surfaced by the credential store, policy checks, and auth flows.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The identity is not a syntactically valid email address.
    #[error("invalid email address")]
    InvalidIdentity,

    /// An account with this email already exists.
    #[error("an account with this email already exists")]
    IdentityExists,

    /// No account is registered under this email.
    #[error("no account registered for this email")]
    IdentityNotFound,

    /// The password fails the strength policy.
    #[error("password does not meet the strength requirements")]
    WeakPassword,

    /// The security answer did not match the stored one.
    #[error("security answer does not match")]
    RecoveryFailed,

    /// The password hashing backend rejected the input.
    #[error("password hashing failed: {0}")]
    Hashing(String),

    /// Unrecoverable filesystem failure while reading or writing the store.
    #[error("credential store I/O failed: {0}")]
    Store(#[from] std::io::Error),
}

impl From<csv::Error> for AuthError {
    fn from(err: csv::Error) -> Self {
        let detail = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(io) => AuthError::Store(io),
            _ => AuthError::Store(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                detail,
            )),
        }
    }
}
