//! Opaque bearer tokens issued by the local auth store.
//!
//! A token resolves to its identity until it expires or is revoked; the
//! resolved identity is what the task policies compare row owners against.

use crate::libs::config::SessionConfig;
use crate::libs::error::{TaskError, TaskResult};
use crate::libs::messages::Message;
use crate::libs::session::{Identity, Session};
use base64::prelude::*;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use rusqlite::{params, Connection, OptionalExtension};

const INSERT_SESSION: &str = "INSERT INTO auth_sessions (token, user_id, expires_at) VALUES (?1, ?2, ?3)";
const SELECT_SESSION: &str = "SELECT u.id, u.email, s.expires_at
    FROM auth_sessions s JOIN users u ON u.id = s.user_id
    WHERE s.token = ?1";
const DELETE_SESSION: &str = "DELETE FROM auth_sessions WHERE token = ?1";
const DELETE_EXPIRED: &str = "DELETE FROM auth_sessions WHERE expires_at <= ?1";

pub struct AuthSessions<'a> {
    conn: &'a Connection,
}

impl<'a> AuthSessions<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn issue(&self, user: &Identity, ttl: Duration) -> TaskResult<Session> {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let access_token = BASE64_URL_SAFE_NO_PAD.encode(bytes);
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .ok_or_else(|| TaskError::Validation(Message::SessionTtlOutOfRange(SessionConfig::MAX_TTL_HOURS)))?;

        self.conn.execute(INSERT_SESSION, params![access_token, user.id, expires_at])?;

        Ok(Session {
            access_token,
            expires_at,
            user: user.clone(),
        })
    }

    /// Resolves a token to its identity. Expired tokens are removed and
    /// rejected like unknown ones.
    pub fn authenticate(&self, token: &str) -> TaskResult<Identity> {
        let found = self
            .conn
            .query_row(SELECT_SESSION, params![token], |row| {
                let identity = Identity {
                    id: row.get(0)?,
                    email: row.get(1)?,
                };
                let expires_at: DateTime<Utc> = row.get(2)?;
                Ok((identity, expires_at))
            })
            .optional()?;

        match found {
            Some((identity, expires_at)) if expires_at > Utc::now() => Ok(identity),
            Some(_) => {
                self.revoke(token)?;
                Err(TaskError::Auth(Message::SessionExpired))
            }
            None => Err(TaskError::Auth(Message::InvalidSessionToken)),
        }
    }

    pub fn revoke(&self, token: &str) -> TaskResult<usize> {
        Ok(self.conn.execute(DELETE_SESSION, params![token])?)
    }

    pub fn purge_expired(&self) -> TaskResult<usize> {
        Ok(self.conn.execute(DELETE_EXPIRED, params![Utc::now()])?)
    }
}
