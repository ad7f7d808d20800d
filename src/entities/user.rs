//! User entity - staff accounts returned by the accounts API.

use super::{Record, null_as_default};
use serde::{Deserialize, Serialize};

/// Permission flags as serialized by the server (`{"ADMIN": bool, "STAFF": bool}`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    #[serde(rename = "ADMIN", default)]
    pub admin: bool,
    #[serde(rename = "STAFF", default)]
    pub staff: bool,
}

/// An authenticated or listed user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Full name as computed by the server
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub permissions: Permissions,
    #[serde(default)]
    pub grupo: Option<String>,
    /// Always present on the client side, empty when the server omits it
    #[serde(default, deserialize_with = "null_as_default")]
    pub roles: Vec<String>,
}

impl User {
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Name to show in listings: the full name when set, the username otherwise.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.username
        } else {
            &self.name
        }
    }
}

impl Record for User {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
}

impl Record for Role {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Payload for `POST /api/accounts/add-user`.
#[derive(Clone, Debug, Default, Serialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grupo: Option<String>,
}
