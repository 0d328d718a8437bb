//! Account registration, login and session checks.
//!
//! Passwords are hashed with Argon2id and stored as PHC strings. A login
//! creates a random session token valid for a configurable number of days.

use crate::database::users;
use crate::error::{AppError, Result};
use crate::models::{Session, User};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::{Rng, RngCore};
use rusqlite::Connection;

pub const MIN_PASSWORD_LEN: usize = 8;
const TOKEN_LEN: usize = 48;

pub fn hash_password(password: &str) -> Result<String> {
    let mut salt_bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt_bytes);
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| AppError::PasswordHash(e.to_string()))?;

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| AppError::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

fn new_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Creates an account. Name and email are trimmed before validation.
pub fn register(
    name: &str,
    email: &str,
    password: &str,
    now: DateTime<Utc>,
    conn: &Connection,
) -> Result<User> {
    let name = name.trim();
    let email = email.trim();
    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AppError::Validation("Missing required fields".to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        )));
    }

    let hash = hash_password(password)?;
    let user = users::create_user(name, email, &hash, now, conn)?;
    log::info!("Registered user {} ({})", user.id, user.email);
    Ok(user)
}

/// Checks credentials and opens a session. Unknown emails and wrong passwords
/// are reported the same way.
pub fn login(
    email: &str,
    password: &str,
    session_days: i64,
    now: DateTime<Utc>,
    conn: &Connection,
) -> Result<Session> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::Unauthorized);
    }

    let Some(record) = users::find_user_by_email(email, conn)? else {
        log::warn!("Login attempt for unknown email {}", email);
        return Err(AppError::Unauthorized);
    };
    if !verify_password(password, &record.password_hash)? {
        log::warn!("Wrong password for user {}", record.user.id);
        return Err(AppError::Unauthorized);
    }

    let expires_at = Duration::try_days(session_days)
        .filter(|length| *length > Duration::zero())
        .and_then(|length| now.checked_add_signed(length))
        .ok_or_else(|| {
            AppError::InvalidArgument(format!("session length of {} days is out of range", session_days))
        })?;
    let session = Session {
        token: new_token(),
        user: record.user,
        created_at: now,
        expires_at,
    };
    users::insert_session(&session, conn)?;
    log::info!("User {} logged in", session.user.id);
    Ok(session)
}

/// Resolves a token to its live session. Expired sessions are removed.
pub fn require_session(token: Option<&str>, now: DateTime<Utc>, conn: &Connection) -> Result<Session> {
    let token = token.filter(|t| !t.is_empty()).ok_or(AppError::Unauthorized)?;
    let session = users::find_session(token, conn)?.ok_or(AppError::Unauthorized)?;
    if session.is_expired(now) {
        users::delete_session(token, conn)?;
        log::debug!("Session for user {} expired", session.user.id);
        return Err(AppError::Unauthorized);
    }
    Ok(session)
}

pub fn logout(session: &Session, conn: &Connection) -> Result<()> {
    users::delete_session(&session.token, conn)?;
    log::info!("User {} logged out", session.user.id);
    Ok(())
}
