use crate::libs::error::TaskResult;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const INSERT_PROFILE: &str = "INSERT OR IGNORE INTO profiles (id, email) VALUES (?1, ?2)";
const SELECT_PROFILE: &str = "SELECT id, email, created_at FROM profiles WHERE id = ?1";
const COUNT_PROFILES: &str = "SELECT COUNT(*) FROM profiles WHERE id = ?1";
const DELETE_PROFILE: &str = "DELETE FROM profiles WHERE id = ?1";

/// Identity record provisioned once per registered user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

pub struct Profiles<'a> {
    conn: &'a Connection,
}

impl<'a> Profiles<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn get(&self, id: Uuid) -> TaskResult<Option<Profile>> {
        let profile = self
            .conn
            .query_row(SELECT_PROFILE, params![id], |row| {
                Ok(Profile {
                    id: row.get(0)?,
                    email: row.get(1)?,
                    created_at: row.get(2)?,
                })
            })
            .optional()?;

        Ok(profile)
    }

    /// Provisions a profile; returns 0 when one already exists for `id`.
    pub fn insert(&self, id: Uuid, email: &str) -> TaskResult<usize> {
        Ok(self.conn.execute(INSERT_PROFILE, params![id, email])?)
    }

    pub fn count(&self, id: Uuid) -> TaskResult<usize> {
        let count: i64 = self.conn.query_row(COUNT_PROFILES, params![id], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Deletes the profile and, by cascade, all of its tasks.
    pub fn delete(&self, id: Uuid) -> TaskResult<usize> {
        Ok(self.conn.execute(DELETE_PROFILE, params![id])?)
    }
}
