//! Users and login sessions.

use crate::error::{AppError, Result};
use crate::models::{Session, User};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};

/// Stored account with its password hash.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub password_hash: String,
}

pub fn create_user(
    name: &str,
    email: &str,
    password_hash: &str,
    now: DateTime<Utc>,
    conn: &Connection,
) -> Result<User> {
    if find_user_by_email(email, conn)?.is_some() {
        return Err(AppError::Conflict(
            "User with this email already exists".to_string(),
        ));
    }

    conn.execute(
        "INSERT INTO users (name, email, password_hash, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![name, email, password_hash, now],
    )?;

    Ok(User {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        email: email.to_string(),
    })
}

/// Email comparison is case-insensitive.
pub fn find_user_by_email(email: &str, conn: &Connection) -> Result<Option<UserRecord>> {
    let record = conn
        .query_row(
            "SELECT id, name, email, password_hash FROM users WHERE email = ?1",
            params![email],
            |row| {
                Ok(UserRecord {
                    user: User {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        email: row.get(2)?,
                    },
                    password_hash: row.get(3)?,
                })
            },
        )
        .optional()?;
    Ok(record)
}

pub fn insert_session(session: &Session, conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            session.token,
            session.user.id,
            session.created_at,
            session.expires_at
        ],
    )?;
    Ok(())
}

pub fn find_session(token: &str, conn: &Connection) -> Result<Option<Session>> {
    let session = conn
        .query_row(
            "SELECT s.token, s.created_at, s.expires_at, u.id, u.name, u.email
             FROM sessions s
             JOIN users u ON u.id = s.user_id
             WHERE s.token = ?1",
            params![token],
            |row| {
                Ok(Session {
                    token: row.get(0)?,
                    created_at: row.get(1)?,
                    expires_at: row.get(2)?,
                    user: User {
                        id: row.get(3)?,
                        name: row.get(4)?,
                        email: row.get(5)?,
                    },
                })
            },
        )
        .optional()?;
    Ok(session)
}

pub fn delete_session(token: &str, conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
    Ok(())
}

/// Returns the number of sessions removed.
pub fn delete_expired_sessions(now: DateTime<Utc>, conn: &Connection) -> Result<usize> {
    let removed = conn.execute("DELETE FROM sessions WHERE expires_at <= ?1", params![now])?;
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::db::test_connection;
    use chrono::Duration;

    #[test]
    fn test_create_and_find_user() {
        let conn = test_connection();
        let now = Utc::now();
        let user = create_user("Amélie", "amelie@example.com", "hash", now, &conn).unwrap();

        let found = find_user_by_email("AMELIE@example.com", &conn).unwrap().unwrap();
        assert_eq!(found.user, user);
        assert_eq!(found.password_hash, "hash");
    }

    #[test]
    fn test_duplicate_email_conflicts() {
        let conn = test_connection();
        let now = Utc::now();
        create_user("A", "a@example.com", "hash", now, &conn).unwrap();
        let result = create_user("B", "A@example.com", "hash", now, &conn);
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[test]
    fn test_session_lifecycle() {
        let conn = test_connection();
        let now = Utc::now();
        let user = create_user("A", "a@example.com", "hash", now, &conn).unwrap();
        let session = Session {
            token: "tok".to_string(),
            user: user.clone(),
            created_at: now,
            expires_at: now + Duration::days(1),
        };
        insert_session(&session, &conn).unwrap();

        let found = find_session("tok", &conn).unwrap().unwrap();
        assert_eq!(found.user, user);

        assert_eq!(delete_expired_sessions(now, &conn).unwrap(), 0);
        assert_eq!(
            delete_expired_sessions(now + Duration::days(2), &conn).unwrap(),
            1
        );
        assert!(find_session("tok", &conn).unwrap().is_none());
    }
}
