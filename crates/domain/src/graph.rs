//! Identity graph shapes handed to the host: resources, entitlements, grants.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Entitlement slug for role and access-role assignment.
pub const ASSIGNED_ENTITLEMENT: &str = "assigned";

/// Entitlement slug for team membership.
pub const MEMBER_ENTITLEMENT: &str = "member";

/// Resource types synchronized by the connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceTypeId {
    /// Zuper user accounts.
    User,
    /// Built-in roles.
    Role,
    /// Access roles discovered from users.
    AccessRole,
    /// Teams.
    Team,
}

/// Trait the host attaches to a resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceTrait {
    /// Principal accounts.
    User,
    /// Assignable roles.
    Role,
    /// Membership groups.
    Group,
}

/// Resource type descriptor returned by each syncer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResourceType {
    /// Stable type id.
    pub id: ResourceTypeId,
    /// Display name.
    pub display_name: &'static str,
    /// Host trait.
    pub resource_trait: ResourceTrait,
}

impl ResourceTypeId {
    /// Returns the stable wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Role => "role",
            Self::AccessRole => "access-role",
            Self::Team => "team",
        }
    }

    /// Returns every resource type in sync order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[ResourceTypeId] = &[
            ResourceTypeId::User,
            ResourceTypeId::Role,
            ResourceTypeId::AccessRole,
            ResourceTypeId::Team,
        ];

        ALL
    }

    /// Returns the full descriptor for this type.
    #[must_use]
    pub fn descriptor(self) -> ResourceType {
        let (display_name, resource_trait) = match self {
            Self::User => ("User", ResourceTrait::User),
            Self::Role => ("Role", ResourceTrait::Role),
            Self::AccessRole => ("Access Role", ResourceTrait::Role),
            Self::Team => ("Team", ResourceTrait::Group),
        };

        ResourceType {
            id: self,
            display_name,
            resource_trait,
        }
    }
}

impl Display for ResourceTypeId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Identifies a resource inside the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId {
    /// Resource type.
    pub resource_type: ResourceTypeId,
    /// Upstream identifier (uid or role key).
    pub resource: String,
}

impl ResourceId {
    /// Creates a resource identifier.
    #[must_use]
    pub fn new(resource_type: ResourceTypeId, resource: impl Into<String>) -> Self {
        Self {
            resource_type,
            resource: resource.into(),
        }
    }

    /// Shorthand for a user principal.
    #[must_use]
    pub fn user(user_uid: impl Into<String>) -> Self {
        Self::new(ResourceTypeId::User, user_uid)
    }
}

impl Display for ResourceId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}:{}", self.resource_type, self.resource)
    }
}

/// Account status carried by user resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// Active account.
    Enabled,
    /// Inactive account.
    Disabled,
    /// Deleted account.
    Deleted,
}

impl UserStatus {
    /// Derives status from upstream flags; deletion wins over inactivity.
    #[must_use]
    pub fn from_flags(is_active: bool, is_deleted: bool) -> Self {
        if is_deleted {
            Self::Deleted
        } else if is_active {
            Self::Enabled
        } else {
            Self::Disabled
        }
    }
}

/// User-specific attributes of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTrait {
    /// Account status.
    pub status: UserStatus,
    /// Login used by the account.
    pub login: String,
    /// Primary email address.
    pub email: String,
}

/// Synchronized resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Resource identifier.
    pub id: ResourceId,
    /// Display name.
    pub display_name: String,
    /// Free-form profile attributes.
    pub profile: Map<String, Value>,
    /// User attributes, present for user resources only.
    pub user_trait: Option<UserTrait>,
}

impl Resource {
    /// Creates a resource without a user trait.
    #[must_use]
    pub fn new(id: ResourceId, display_name: impl Into<String>, profile: Map<String, Value>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            profile,
            user_trait: None,
        }
    }

    /// Attaches user attributes.
    #[must_use]
    pub fn with_user_trait(mut self, user_trait: UserTrait) -> Self {
        self.user_trait = Some(user_trait);
        self
    }
}

/// Grantable capability exposed by a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entitlement {
    /// `"{type}:{resource}:{slug}"`.
    pub id: String,
    /// Resource exposing the entitlement.
    pub resource: Resource,
    /// Entitlement slug such as `assigned` or `member`.
    pub slug: String,
    /// Display name.
    pub display_name: String,
    /// Description.
    pub description: String,
    /// Resource types this entitlement can be granted to.
    pub grantable_to: Vec<ResourceTypeId>,
}

impl Entitlement {
    /// Creates an assignment entitlement grantable to users.
    #[must_use]
    pub fn assignment(
        resource: Resource,
        slug: &str,
        display_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: entitlement_id(&resource.id, slug),
            resource,
            slug: slug.to_owned(),
            display_name: display_name.into(),
            description: description.into(),
            grantable_to: vec![ResourceTypeId::User],
        }
    }
}

/// Builds the stable entitlement id for a resource and slug.
#[must_use]
pub fn entitlement_id(resource: &ResourceId, slug: &str) -> String {
    format!("{resource}:{slug}")
}

/// Realized edge between an entitlement and a principal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grant {
    /// `"{entitlement_id}:{principal_type}:{principal_id}"`.
    pub id: String,
    /// Granted entitlement.
    pub entitlement: Entitlement,
    /// Principal receiving the entitlement.
    pub principal: ResourceId,
    /// Free-form grant metadata.
    pub metadata: Map<String, Value>,
}

impl Grant {
    /// Creates a grant of `slug` on `resource` to `principal`.
    #[must_use]
    pub fn new(resource: Resource, slug: &str, principal: ResourceId) -> Self {
        let entitlement = Entitlement {
            id: entitlement_id(&resource.id, slug),
            resource,
            slug: slug.to_owned(),
            display_name: String::new(),
            description: String::new(),
            grantable_to: vec![ResourceTypeId::User],
        };

        Self::for_entitlement(entitlement, principal)
    }

    /// Creates a grant of an existing entitlement to `principal`.
    #[must_use]
    pub fn for_entitlement(entitlement: Entitlement, principal: ResourceId) -> Self {
        Self {
            id: format!("{}:{principal}", entitlement.id),
            entitlement,
            principal,
            metadata: Map::new(),
        }
    }

    /// Adds one metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_owned(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Map;

    use super::*;

    #[test]
    fn resource_type_serializes_as_wire_value() {
        for resource_type in ResourceTypeId::all() {
            let value = serde_json::to_value(resource_type).ok();
            assert_eq!(value, Some(Value::from(resource_type.as_str())));
            assert_eq!(resource_type.to_string(), resource_type.as_str());
        }
    }

    #[test]
    fn access_role_type_has_role_trait() {
        let descriptor = ResourceTypeId::AccessRole.descriptor();
        assert_eq!(descriptor.display_name, "Access Role");
        assert_eq!(descriptor.resource_trait, ResourceTrait::Role);
        assert_eq!(ResourceTypeId::Team.descriptor().resource_trait, ResourceTrait::Group);
    }

    #[test]
    fn deleted_wins_over_active() {
        assert_eq!(UserStatus::from_flags(true, true), UserStatus::Deleted);
        assert_eq!(UserStatus::from_flags(false, false), UserStatus::Disabled);
        assert_eq!(UserStatus::from_flags(true, false), UserStatus::Enabled);
    }

    #[test]
    fn grant_ids_compose_entitlement_and_principal() {
        let role = Resource::new(
            ResourceId::new(ResourceTypeId::Role, "ADMIN"),
            "Administrator",
            Map::new(),
        );
        let grant = Grant::new(role, ASSIGNED_ENTITLEMENT, ResourceId::user("u1"))
            .with_metadata("message", "ok");

        assert_eq!(grant.entitlement.id, "role:ADMIN:assigned");
        assert_eq!(grant.id, "role:ADMIN:assigned:user:u1");
        assert_eq!(grant.metadata.get("message"), Some(&serde_json::json!("ok")));
    }
}
