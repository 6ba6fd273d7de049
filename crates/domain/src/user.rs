//! User records as returned by the Zuper API.

use serde::{Deserialize, Serialize};

/// Role reference embedded in a user record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRoleRef {
    /// Upstream numeric role id rendered as a string (`"1"`, `"2"`, `"3"`).
    #[serde(default)]
    pub role_uid: String,
    /// Human readable role name.
    #[serde(default)]
    pub role_name: String,
    /// Stable role key such as `ADMIN`.
    #[serde(default)]
    pub role_key: String,
}

/// Access role embedded in a user record.
///
/// The API has no listing endpoint for access roles; they are only ever seen
/// on the users that carry them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRole {
    /// Unique access role identifier.
    #[serde(default)]
    pub access_role_uid: String,
    /// Access role display name.
    #[serde(default, rename = "role_name")]
    pub name: String,
    /// Free-form access role description.
    #[serde(default, rename = "role_description")]
    pub description: String,
}

/// User record from the users collection or the user detail endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub user_uid: String,
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Login email address.
    #[serde(default)]
    pub email: String,
    /// Job designation, e.g. "Field Executive".
    #[serde(default)]
    pub designation: String,
    /// Employment code.
    #[serde(default)]
    pub emp_code: String,
    /// Whether the account is active.
    #[serde(default)]
    pub is_active: bool,
    /// Whether the account has been deleted upstream.
    #[serde(default)]
    pub is_deleted: bool,
    /// Upstream creation timestamp, passed through verbatim.
    #[serde(default)]
    pub created_at: String,
    /// Upstream update timestamp, passed through verbatim.
    #[serde(default)]
    pub updated_at: String,
    /// Role currently assigned to the user.
    #[serde(default)]
    pub role: Option<UserRoleRef>,
    /// Access role currently assigned to the user.
    #[serde(default)]
    pub access_role: Option<AccessRole>,
}

impl User {
    /// Returns "first last" as shown in the identity graph.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns the assigned role key when the user has a non-empty one.
    #[must_use]
    pub fn role_key(&self) -> Option<&str> {
        self.role
            .as_ref()
            .map(|role| role.role_key.as_str())
            .filter(|key| !key.is_empty())
    }

    /// Returns the assigned access role when its uid is non-empty.
    #[must_use]
    pub fn assigned_access_role(&self) -> Option<&AccessRole> {
        self.access_role
            .as_ref()
            .filter(|access_role| !access_role.access_role_uid.is_empty())
    }
}

/// Payload for the user creation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Login email address.
    pub email: String,
    /// Initial password.
    pub password: String,
    /// Job designation.
    pub designation: String,
    /// Employment code.
    pub emp_code: String,
    /// Role id rendered as a string.
    pub role_id: String,
}

/// Outcome of a successful user creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedUser {
    /// Identifier assigned by the API.
    pub user_uid: String,
    /// Upstream success message.
    pub message: String,
}

/// Acknowledgement returned by upstream mutations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationReceipt {
    /// Upstream envelope type, usually `success`.
    #[serde(default, rename = "type")]
    pub kind: String,
    /// Upstream envelope title.
    #[serde(default)]
    pub title: String,
    /// Upstream envelope message.
    #[serde(default)]
    pub message: String,
}
