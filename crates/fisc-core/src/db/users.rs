//! User account operations

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::User;

impl Database {
    /// Create a user with an already-hashed password
    ///
    /// Email is unique (case-insensitive); a duplicate is `InvalidData`.
    pub fn create_user(&self, email: &str, name: &str, password_hash: &str) -> Result<User> {
        let conn = self.conn()?;

        let inserted = conn.execute(
            "INSERT INTO users (email, name, password_hash) VALUES (?, ?, ?)",
            params![email, name, password_hash],
        );

        match inserted {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                return Err(Error::InvalidData(format!(
                    "Email already registered: {}",
                    email
                )));
            }
            Err(e) => return Err(e.into()),
        }

        let id = conn.last_insert_rowid();
        self.get_user(id)?
            .ok_or_else(|| Error::NotFound(format!("User {}", id)))
    }

    /// Fetch a user by id
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, email, name, created_at FROM users WHERE id = ?",
                params![id],
                Self::row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Fetch a user and their stored password hash by email
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<(User, String)>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT id, email, name, created_at, password_hash FROM users WHERE email = ?",
                params![email],
                |row| Ok((Self::row_to_user(row)?, row.get::<_, String>(4)?)),
            )
            .optional()?;
        Ok(row)
    }

    /// Count registered users
    pub fn count_users(&self) -> Result<i64> {
        let conn = self.conn()?;
        Ok(conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?)
    }

    fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
        Ok(User {
            id: row.get(0)?,
            email: row.get(1)?,
            name: row.get(2)?,
            created_at: parse_datetime(&row.get::<_, String>(3)?),
        })
    }
}
