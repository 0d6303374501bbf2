//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Unique email address, used as the login name.
    pub email: String,
    /// First name.
    pub fname: Option<String>,
    /// Last name.
    pub lname: Option<String>,
    /// Argon2 PHC digest. Never serialized.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Administrative flag.
    pub is_admin: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Returns "fname lname" when either part is set.
    pub fn display_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.fname.as_deref(), self.lname.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Email address.
    pub email: String,
    /// Already-hashed password digest.
    pub password_hash: String,
    /// First name.
    pub fname: Option<String>,
    /// Last name.
    pub lname: Option<String>,
    /// Administrative flag.
    pub is_admin: bool,
}

/// Profile fields a user (or an admin) may change.
///
/// `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPatch {
    /// New first name.
    pub fname: Option<String>,
    /// New last name.
    pub lname: Option<String>,
    /// New email address.
    pub email: Option<String>,
}

impl UserPatch {
    /// Returns true when no field would change.
    pub fn is_empty(&self) -> bool {
        self.fname.is_none() && self.lname.is_none() && self.email.is_none()
    }

    /// Applies the patch to an in-memory user.
    pub fn apply(&self, user: &mut User) {
        if let Some(fname) = &self.fname {
            user.fname = Some(fname.clone());
        }
        if let Some(lname) = &self.lname {
            user.lname = Some(lname.clone());
        }
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
    }
}
