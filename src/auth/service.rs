//! Account lifecycle: registration, attempt-limited login, and
//! security-question password recovery.
//!
//! ## Design
//! - The service holds no cached state. Every operation loads the store,
//!   acts, and saves, so concurrent processes see each other's writes at
//!   the next operation boundary.
//! - Login lives in [`LoginSession`], a small state machine with a fixed
//!   attempt budget. Rejections stay deliberately vague about whether the
//!   email or the password was wrong.
//! - Recovery answers are normalized (trimmed, lowercased) and stored
//!   hashed, exactly like passwords.
//! - Recovery lookups do say when an email is unknown. The store is a
//!   local file its owner can read anyway, so login-style vagueness
//!   there would hide nothing and cost usability.

use crate::auth::error::AuthError;
use crate::auth::store::{CredentialRecord, CredentialStore};
use crate::auth::{hasher, policy};

/// Login attempts granted per session before lockout.
pub const MAX_LOGIN_ATTEMPTS: u32 = 5;

/// Everything needed to create an account.
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub recovery_question: String,
    pub recovery_answer: String,
}

/// Result of a single login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Credentials accepted. `identity` is the account email.
    Authenticated { identity: String },
    /// Wrong email or password, indistinguishable on purpose. `remaining`
    /// is the attempt budget left in this session.
    Rejected { remaining: u32 },
    /// The budget is spent. The session is over for good; a fresh one is
    /// the only way to try again.
    LockedOut,
}

/// Credential operations over a [`CredentialStore`].
pub struct AuthService {
    store: CredentialStore,
    attempt_budget: u32,
}

impl AuthService {
    /// Service with the default login attempt budget.
    pub fn new(store: CredentialStore) -> Self {
        Self::with_attempt_budget(store, MAX_LOGIN_ATTEMPTS)
    }

    /// Service with a custom login attempt budget.
    pub fn with_attempt_budget(store: CredentialStore, attempt_budget: u32) -> Self {
        Self {
            store,
            attempt_budget,
        }
    }

    // ── Registration ────────────────────────────────────────────────

    /// Create an account. Checks run in a fixed order so the caller can
    /// re-prompt for exactly the field that failed: identity syntax,
    /// then duplicates, then password strength. On any error the store
    /// is left untouched.
    pub fn register(&self, request: RegisterRequest) -> Result<(), AuthError> {
        let mut accounts = self.store.load()?;

        let email = request.email.trim().to_string();
        if !policy::valid_email(&email) {
            return Err(AuthError::InvalidIdentity);
        }
        if accounts.contains_key(&email) {
            return Err(AuthError::IdentityExists);
        }
        if !policy::valid_password(&request.password) {
            return Err(AuthError::WeakPassword);
        }

        let record = CredentialRecord {
            email: email.clone(),
            password_hash: hasher::hash(&request.password)?,
            recovery_question: request.recovery_question.trim().to_string(),
            recovery_answer_hash: hasher::hash(&normalize_answer(&request.recovery_answer))?,
        };
        accounts.insert(email.clone(), record);
        self.store.save(&accounts)?;
        tracing::info!(email = %email, "Account registered");
        Ok(())
    }

    /// Whether an account exists for this email.
    pub fn is_registered(&self, email: &str) -> Result<bool, AuthError> {
        Ok(self.store.load()?.contains_key(email.trim()))
    }

    // ── Login ───────────────────────────────────────────────────────

    /// Start an interactive login with the configured attempt budget.
    pub fn begin_login(&self) -> LoginSession<'_> {
        LoginSession {
            service: self,
            remaining: self.attempt_budget,
        }
    }

    // ── Password Recovery ───────────────────────────────────────────

    /// The security question to put to whoever claims this email.
    pub fn recovery_question(&self, email: &str) -> Result<String, AuthError> {
        let accounts = self.store.load()?;
        accounts
            .get(email.trim())
            .map(|record| record.recovery_question.clone())
            .ok_or(AuthError::IdentityNotFound)
    }

    /// Check a recovery answer without changing anything. Lets the caller
    /// gate the new-password prompt on a correct answer.
    pub fn verify_recovery_answer(&self, email: &str, answer: &str) -> Result<(), AuthError> {
        let accounts = self.store.load()?;
        let record = accounts
            .get(email.trim())
            .ok_or(AuthError::IdentityNotFound)?;
        if hasher::verify(&record.recovery_answer_hash, &normalize_answer(answer)) {
            Ok(())
        } else {
            Err(AuthError::RecoveryFailed)
        }
    }

    /// Replace the password after re-proving the recovery answer. The
    /// answer check comes before the strength check, so a caller looping
    /// on `WeakPassword` is already authorized.
    pub fn reset_password(
        &self,
        email: &str,
        answer: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let mut accounts = self.store.load()?;
        let record = accounts
            .get_mut(email.trim())
            .ok_or(AuthError::IdentityNotFound)?;
        if !hasher::verify(&record.recovery_answer_hash, &normalize_answer(answer)) {
            return Err(AuthError::RecoveryFailed);
        }
        if !policy::valid_password(new_password) {
            return Err(AuthError::WeakPassword);
        }

        record.password_hash = hasher::hash(new_password)?;
        let email = record.email.clone();
        self.store.save(&accounts)?;
        tracing::info!(email = %email, "Password reset via recovery answer");
        Ok(())
    }
}

/// One interactive login. Attempts draw down a fixed budget; once it is
/// spent the session answers [`LoginOutcome::LockedOut`] forever.
pub struct LoginSession<'a> {
    service: &'a AuthService,
    remaining: u32,
}

impl LoginSession<'_> {
    /// Attempts left before lockout.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// True once the budget is spent.
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Try one email + password pair. The store is re-read on every
    /// attempt, so accounts created after the session began still count.
    pub fn attempt(&mut self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        if self.remaining == 0 {
            tracing::warn!("Login attempt after budget exhausted");
            return Ok(LoginOutcome::LockedOut);
        }

        let trimmed = email.trim();
        let accounts = self.service.store.load()?;
        match accounts.get(trimmed) {
            Some(record) if hasher::verify(&record.password_hash, password) => {
                tracing::info!(email = %record.email, "Login succeeded");
                return Ok(LoginOutcome::Authenticated {
                    identity: record.email.clone(),
                });
            }
            Some(_) => {}
            None => {
                // Burn one hash so unknown emails cost as much as wrong
                // passwords.
                let _ = hasher::hash(password);
            }
        }

        self.remaining -= 1;
        tracing::debug!(remaining = self.remaining, "Login attempt rejected");
        Ok(LoginOutcome::Rejected {
            remaining: self.remaining,
        })
    }
}

/// Recovery answers are compared case-insensitively with surrounding
/// whitespace ignored.
fn normalize_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}

// ── Tests ───────────────────────────────────────────────────────────
