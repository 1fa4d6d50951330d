//! Account registration and password verification
//!
//! Passwords are stored as Argon2id PHC strings with a random per-account salt.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use serde::Deserialize;
use tracing::info;

use crate::error::{Error, Result};
use crate::models::{Account, NewAccount};
use crate::repository::Repository;

/// Minimum accepted password length in characters
pub const MIN_PASSWORD_LEN: usize = 6;

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC string
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| Error::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Sign-up form
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl Registration {
    /// Check the form without touching storage
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty()
            || self.email.trim().is_empty()
            || self.password.is_empty()
            || self.confirm_password.is_empty()
        {
            return Err(Error::Validation("Please fill in all fields".to_string()));
        }
        if self.password != self.confirm_password {
            return Err(Error::Validation("Passwords do not match".to_string()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::Validation(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }
}

/// Validate the form and create the account
///
/// New accounts start with zero salary and savings.
pub fn register_account<R: Repository + ?Sized>(repo: &R, form: &Registration) -> Result<Account> {
    form.validate()?;

    let email = form.email.trim();
    if repo.get_account_by_email(email)?.is_some() {
        return Err(Error::Conflict("Email already registered".to_string()));
    }

    let password_hash = hash_password(&form.password)?;
    let account = repo.create_account(&NewAccount::new(
        form.username.trim(),
        email,
        password_hash,
    ))?;

    info!(account_id = account.id, "Registered new account");
    Ok(account)
}

/// Look up an account by email and check its password
///
/// Returns `None` for an unknown email or a wrong password alike.
pub fn authenticate<R: Repository + ?Sized>(
    repo: &R,
    email: &str,
    password: &str,
) -> Result<Option<Account>> {
    let Some(account) = repo.get_account_by_email(email.trim())? else {
        return Ok(None);
    };

    if verify_password(password, &account.password_hash)? {
        Ok(Some(account))
    } else {
        Ok(None)
    }
}
