//! Authentication models

use sha1::{Digest, Sha1};
use std::fmt;

/// Klereo account credentials. Immutable for the lifetime of a client.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Lower-case hex SHA-1 of the password, as the login endpoint expects it
    pub fn password_digest(&self) -> String {
        let mut hasher = Sha1::new();
        hasher.update(self.password.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
