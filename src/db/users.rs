//! Identities of the local auth store.
//!
//! Passwords are kept as salted SHA-256 digests, both parts base64 encoded.
//! Inserting a user fires `on_auth_user_created`, which provisions the
//! matching profile.

use crate::libs::error::{TaskError, TaskResult};
use crate::libs::messages::Message;
use crate::libs::session::Identity;
use base64::prelude::*;
use rand::RngCore;
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use uuid::Uuid;

pub const MIN_PASSWORD_LEN: usize = 6;

const INSERT_USER: &str = "INSERT INTO users (id, email, password_hash, salt) VALUES (?1, ?2, ?3, ?4)";
const SELECT_USER_BY_EMAIL: &str = "SELECT id, email, password_hash, salt FROM users WHERE email = ?1";
const DELETE_USER: &str = "DELETE FROM users WHERE id = ?1";

pub struct Users<'a> {
    conn: &'a Connection,
}

impl<'a> Users<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Registers a new identity. Emails are unique, case-insensitively.
    pub fn create(&self, email: &str, password: &str) -> TaskResult<Identity> {
        let email = email.trim();
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(TaskError::Validation(Message::PasswordTooShort(MIN_PASSWORD_LEN)));
        }
        if self.find(email)?.is_some() {
            return Err(TaskError::Validation(Message::EmailAlreadyRegistered(email.to_string())));
        }

        let id = Uuid::new_v4();
        let salt = generate_salt();
        let password_hash = hash_password(&salt, password);
        self.conn.execute(INSERT_USER, params![id, email, password_hash, salt])?;
        tracing::debug!(user = %id, "identity registered");

        Ok(Identity {
            id,
            email: email.to_string(),
        })
    }

    /// Checks credentials; unknown email and wrong password look the same.
    pub fn verify(&self, email: &str, password: &str) -> TaskResult<Identity> {
        match self.find(email.trim())? {
            Some((identity, password_hash, salt)) if hash_password(&salt, password) == password_hash => Ok(identity),
            _ => Err(TaskError::Auth(Message::WrongCredentials)),
        }
    }

    /// Removes the identity together with its profile, sessions and tasks.
    pub fn delete(&self, id: Uuid) -> TaskResult<usize> {
        Ok(self.conn.execute(DELETE_USER, params![id])?)
    }

    fn find(&self, email: &str) -> TaskResult<Option<(Identity, String, String)>> {
        let user = self
            .conn
            .query_row(SELECT_USER_BY_EMAIL, params![email], |row| {
                Ok((
                    Identity {
                        id: row.get(0)?,
                        email: row.get(1)?,
                    },
                    row.get(2)?,
                    row.get(3)?,
                ))
            })
            .optional()?;

        Ok(user)
    }
}

fn generate_salt() -> String {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    BASE64_STANDARD.encode(salt)
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    BASE64_STANDARD.encode(hasher.finalize())
}
