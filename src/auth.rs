//! Credential gate: resolves a username/password pair to an [`Identity`].
//!
//! The registry is a fixed in-memory table. Passwords are compared as opaque
//! strings; a production replacement must store and compare hashes instead.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, info};

use crate::config::UserEntry;
use crate::session::{Identity, Profile, Role};

/// Authentication failure. Carries no detail about which field
/// was wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Unknown username or wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,
}

#[derive(Clone)]
struct RegistryEntry {
    password: String,
    role: Role,
    profile: Profile,
}

/// Fixed username → `{password, role, profile}` table.
#[derive(Clone)]
pub struct CredentialRegistry {
    entries: BTreeMap<String, RegistryEntry>,
}

impl fmt::Debug for CredentialRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRegistry")
            .field("usernames", &self.entries.keys().collect::<Vec<_>>())
            .field("passwords", &"[REDACTED]")
            .finish()
    }
}

impl Default for CredentialRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CredentialRegistry {
    /// The demo registry: `student`/`123` and `admin`/`admin`.
    pub fn builtin() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(
            "student".to_owned(),
            RegistryEntry {
                password: "123".to_owned(),
                role: Role::Student,
                profile: Profile::Fresher,
            },
        );
        entries.insert(
            "admin".to_owned(),
            RegistryEntry {
                password: "admin".to_owned(),
                role: Role::Admin,
                profile: Profile::General,
            },
        );
        Self { entries }
    }

    /// Build a registry from `[[users]]` config entries.
    ///
    /// An empty list falls back to [`CredentialRegistry::builtin`]. Later
    /// duplicates of a username replace earlier ones.
    pub fn from_users(users: &[UserEntry]) -> Self {
        if users.is_empty() {
            return Self::builtin();
        }
        let entries = users
            .iter()
            .map(|u| {
                (
                    u.username.clone(),
                    RegistryEntry {
                        password: u.password.clone(),
                        role: u.role,
                        profile: u.profile,
                    },
                )
            })
            .collect();
        Self { entries }
    }

    /// Number of registered users.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no users.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact-match lookup. Usernames are case-sensitive.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown username or a
    /// wrong password alike.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Identity, AuthError> {
        match self.entries.get(username) {
            Some(entry) if entry.password == password => {
                info!(username, role = %entry.role, "authenticated");
                Ok(Identity {
                    username: username.to_owned(),
                    role: entry.role,
                    profile: entry.profile,
                })
            }
            _ => {
                debug!("authentication rejected");
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}
