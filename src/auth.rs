//! Local accounts
//!
//! [`Authenticator`] is the whole surface the rest of the app sees. The
//! bundled [`LocalAuth`] keeps accounts in the local database with argon2
//! password hashes; swapping in a real identity provider means implementing
//! the trait.

use crate::db::{Database, DbError, UserRecord};
use crate::upload::{self, ValidationError};
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub email: String,
    pub name: String,
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        Self { email: r.email, name: r.name }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("Email already exists. Try signing in instead.")]
    EmailTaken,
    #[error("No account found for {0}.")]
    UnknownUser(String),
    #[error("Incorrect password. Please try again.")]
    WrongPassword,
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error(transparent)]
    Db(#[from] DbError),
}

pub type Result<T> = std::result::Result<T, AuthError>;

pub trait Authenticator {
    fn current_user(&self) -> Result<Option<User>>;
    fn sign_in(&self, email: &str, password: &str) -> Result<User>;
    /// `name` falls back to the part of the email before `@`
    fn sign_up(&self, email: &str, password: &str, name: Option<&str>) -> Result<User>;
    fn sign_out(&self) -> Result<()>;
}

pub struct LocalAuth<'a> {
    db: &'a Database,
}

impl<'a> LocalAuth<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }
}

impl Authenticator for LocalAuth<'_> {
    fn current_user(&self) -> Result<Option<User>> {
        Ok(self.db.session_user()?.map(User::from))
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        let email = normalize_email(email);
        upload::check_email(&email)?;
        upload::check_password(password)?;

        let record = self
            .db
            .find_user_by_email(&email)?
            .ok_or_else(|| AuthError::UnknownUser(email.clone()))?;

        if !verify_password(password, &record.password_hash)? {
            log::warn!("failed sign-in for {}", email);
            return Err(AuthError::WrongPassword);
        }

        self.db.start_session(record.id)?;
        log::info!("signed in {}", email);
        Ok(record.into())
    }

    fn sign_up(&self, email: &str, password: &str, name: Option<&str>) -> Result<User> {
        let email = normalize_email(email);
        upload::check_email(&email)?;
        upload::check_password(password)?;

        if self.db.find_user_by_email(&email)?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let name = match name.map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => default_name(&email),
        };
        let hash = hash_password(password)?;
        let id = self.db.insert_user(&email, &name, &hash)?;
        self.db.start_session(id)?;

        log::info!("created account {}", email);
        Ok(User { email, name })
    }

    fn sign_out(&self) -> Result<()> {
        let closed = self.db.end_sessions()?;
        log::debug!("closed {} session(s)", closed);
        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn default_name(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

fn verify_password(password: &str, stored: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| AuthError::Hash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
