//! User accounts keyed by email, with a role and an Argon2 password hash.
//!
//! Emails are stored as given; callers normalise them first. The hash never
//! leaves the process through serde.
//!
//! ```rust
//! use apcal::db::{db::Db, users::{Role, User, Users}};
//!
//! let db = Db::open_in_memory()?;
//! let conn = db.conn();
//! let users = Users::new(&conn);
//! users.insert(&User::new("Ada", "Lovelace", "ada@example.com", "hash".to_string()))?;
//! users.set_role("ada@example.com", Role::Admin)?;
//! assert!(users.get("ada@example.com")?.is_some_and(|u| u.is_admin()));
//! # Ok::<(), anyhow::Error>(())
//! ```

use chrono::NaiveDateTime;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Result, Row};
use serde::{Deserialize, Serialize};

const INSERT_USER: &str = "INSERT INTO users (email, first_name, last_name, password_hash, role) VALUES (?1, ?2, ?3, ?4, ?5)";
const SELECT_BY_EMAIL: &str = "SELECT email, first_name, last_name, password_hash, role, created_at FROM users WHERE email = ?1";
const SELECT_ALL: &str = "SELECT email, first_name, last_name, password_hash, role, created_at FROM users ORDER BY last_name, first_name";
const UPDATE_ROLE: &str = "UPDATE users SET role = ?2 WHERE email = ?1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl ToSql for Role {
    fn to_sql(&self) -> Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Role {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: Option<NaiveDateTime>,
}

impl User {
    pub fn new(first_name: &str, last_name: &str, email: &str, password_hash: String) -> Self {
        Self {
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            password_hash,
            role: Role::User,
            created_at: None,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    fn from_row(row: &Row<'_>) -> Result<Self> {
        Ok(User {
            email: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            password_hash: row.get(3)?,
            role: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

/// User records keyed by email.
pub struct Users<'c> {
    conn: &'c Connection,
}

impl<'c> Users<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, user: &User) -> Result<()> {
        self.conn.execute(
            INSERT_USER,
            params![user.email, user.first_name, user.last_name, user.password_hash, user.role],
        )?;
        Ok(())
    }

    pub fn get(&self, email: &str) -> Result<Option<User>> {
        self.conn.query_row(SELECT_BY_EMAIL, params![email], User::from_row).optional()
    }

    pub fn exists(&self, email: &str) -> Result<bool> {
        Ok(self.get(email)?.is_some())
    }

    pub fn list(&self) -> Result<Vec<User>> {
        let mut stmt = self.conn.prepare(SELECT_ALL)?;
        let users = stmt.query_map([], User::from_row)?.collect::<Result<Vec<_>>>()?;
        Ok(users)
    }

    /// Returns the number of updated rows (0 when the email is unknown).
    pub fn set_role(&self, email: &str, role: Role) -> Result<usize> {
        self.conn.execute(UPDATE_ROLE, params![email, role])
    }
}
