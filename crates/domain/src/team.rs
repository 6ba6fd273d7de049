//! Team records as returned by the Zuper API.

use serde::{Deserialize, Serialize};

use crate::User;

/// Summary of the user that created a team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamCreator {
    /// Creator user identifier.
    pub user_uid: String,
    /// Creator given name.
    pub first_name: String,
    /// Creator family name.
    pub last_name: String,
    /// Creator email address.
    pub email: String,
    /// Creator external login id.
    pub external_login_id: String,
    /// Creator designation.
    pub designation: String,
    /// Creator employment code.
    pub emp_code: String,
    /// Whether the creator account is active.
    pub is_active: bool,
    /// Whether the creator account is deleted.
    pub is_deleted: bool,
}

/// Team record from the teams summary or team detail endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Unique team identifier.
    pub team_uid: String,
    /// Team display name.
    #[serde(default)]
    pub team_name: String,
    /// Team color as configured upstream.
    #[serde(default)]
    pub team_color: String,
    /// Free-form team description.
    #[serde(default)]
    pub team_description: String,
    /// IANA timezone of the team.
    #[serde(default)]
    pub team_timezone: String,
    /// Member count reported by the summary endpoint.
    #[serde(default)]
    pub user_count: i64,
    /// Whether the team is active.
    #[serde(default)]
    pub is_active: bool,
    /// Upstream creation timestamp.
    #[serde(default)]
    pub created_at: String,
    /// Upstream update timestamp.
    #[serde(default)]
    pub updated_at: String,
    /// User that created the team.
    #[serde(default)]
    pub created_by: TeamCreator,
}

/// Team detail together with its current members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMembership {
    /// Team metadata.
    pub team: Team,
    /// Users that belong to the team.
    #[serde(default, rename = "users")]
    pub members: Vec<User>,
}

impl TeamMembership {
    /// Returns true when `user_uid` is a member.
    #[must_use]
    pub fn contains(&self, user_uid: &str) -> bool {
        self.members.iter().any(|member| member.user_uid == user_uid)
    }
}
