use std::str::FromStr;

use serde::{Deserialize, Serialize};
use zuper_core::AppError;

/// Built-in Zuper roles. The set is closed; the API does not expose a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Full administrative access.
    Admin,
    /// Manages a team of field executives.
    TeamLeader,
    /// Default role for field staff.
    FieldExecutive,
}

/// Static description of a built-in role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleDefinition {
    /// Role variant.
    pub role: Role,
    /// Upstream numeric role id.
    pub id: u8,
    /// Stable role key used as the resource id.
    pub key: &'static str,
    /// Display name.
    pub display_name: &'static str,
    /// Description shown in the identity graph.
    pub description: &'static str,
}

const DEFINITIONS: &[RoleDefinition] = &[
    RoleDefinition {
        role: Role::Admin,
        id: 1,
        key: "ADMIN",
        display_name: "Administrator",
        description: "Indicates some actions are exclusive for admins",
    },
    RoleDefinition {
        role: Role::TeamLeader,
        id: 2,
        key: "TEAM_LEADER",
        display_name: "Team Leader",
        description: "Indicates some actions are exclusive for team leaders",
    },
    RoleDefinition {
        role: Role::FieldExecutive,
        id: 3,
        key: "FIELD_EXECUTIVE",
        display_name: "Field Executive",
        description: "Indicates some actions are exclusive for field executives",
    },
];

impl Role {
    /// Role assigned to new accounts and restored on revoke.
    pub const DEFAULT: Self = Self::FieldExecutive;

    /// Returns every role definition in upstream id order.
    #[must_use]
    pub fn definitions() -> &'static [RoleDefinition] {
        DEFINITIONS
    }

    /// Returns the static definition of this role.
    #[must_use]
    pub fn definition(self) -> &'static RoleDefinition {
        match self {
            Self::Admin => &DEFINITIONS[0],
            Self::TeamLeader => &DEFINITIONS[1],
            Self::FieldExecutive => &DEFINITIONS[2],
        }
    }

    /// Returns the stable role key.
    #[must_use]
    pub fn key(self) -> &'static str {
        self.definition().key
    }

    /// Returns the upstream numeric id.
    #[must_use]
    pub fn id(self) -> u8 {
        self.definition().id
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        DEFINITIONS
            .iter()
            .find(|definition| definition.key == value)
            .map(|definition| definition.role)
            .ok_or_else(|| AppError::Validation(format!("role ID not found for key: {value}")))
    }
}
