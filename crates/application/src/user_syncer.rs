//! User resources and the role edges read back from a single user.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tracing::debug;
use zuper_core::AppResult;
use zuper_domain::{
    ASSIGNED_ENTITLEMENT, Entitlement, Grant, PageOptions, PageToken, Resource, ResourceId,
    ResourceType, ResourceTypeId, User, UserStatus, UserTrait,
};

use crate::{AccessRoleCache, Page, ResourceSyncer, SyncContext, UserDirectory};

/// Syncer for Zuper users.
pub struct UserSyncer {
    client: Arc<dyn UserDirectory>,
    access_roles: Arc<AccessRoleCache>,
}

impl UserSyncer {
    /// Creates a user syncer that feeds observed access roles into `access_roles`.
    #[must_use]
    pub fn new(client: Arc<dyn UserDirectory>, access_roles: Arc<AccessRoleCache>) -> Self {
        Self {
            client,
            access_roles,
        }
    }
}

#[async_trait]
impl ResourceSyncer for UserSyncer {
    fn resource_type(&self) -> ResourceType {
        ResourceTypeId::User.descriptor()
    }

    async fn list(
        &self,
        ctx: &SyncContext,
        _parent: Option<&ResourceId>,
        token: &PageToken,
    ) -> AppResult<Page<Resource>> {
        let page = self
            .client
            .list_users(ctx, &PageOptions::from_host(token))
            .await?;
        self.access_roles.observe(&page.items).await;
        debug!(users = page.items.len(), last = page.next_token.is_empty(), "listed users page");

        Ok(Page::new(
            page.items.iter().map(user_resource).collect(),
            page.next_token,
            page.annotations,
        ))
    }

    async fn entitlements(
        &self,
        _ctx: &SyncContext,
        _resource: &Resource,
        _token: &PageToken,
    ) -> AppResult<Page<Entitlement>> {
        Ok(Page::empty())
    }

    async fn grants(
        &self,
        ctx: &SyncContext,
        resource: &Resource,
        _token: &PageToken,
    ) -> AppResult<Page<Grant>> {
        let user = self.client.get_user(ctx, &resource.id.resource).await?;
        let principal = ResourceId::user(user.value.user_uid.clone());
        let mut grants = Vec::with_capacity(2);

        if let (Some(role), Some(role_key)) = (&user.value.role, user.value.role_key()) {
            let role_resource = Resource::new(
                ResourceId::new(ResourceTypeId::Role, role_key),
                role.role_name.clone(),
                Map::new(),
            );
            grants.push(Grant::new(
                role_resource,
                ASSIGNED_ENTITLEMENT,
                principal.clone(),
            ));
        }

        if let Some(access_role) = user.value.assigned_access_role() {
            let access_role_resource = Resource::new(
                ResourceId::new(
                    ResourceTypeId::AccessRole,
                    access_role.access_role_uid.clone(),
                ),
                access_role.name.clone(),
                Map::new(),
            );
            grants.push(Grant::new(
                access_role_resource,
                ASSIGNED_ENTITLEMENT,
                principal,
            ));
        }

        Ok(Page::new(grants, String::new(), user.annotations))
    }
}

/// Maps an upstream user to its graph resource.
pub(crate) fn user_resource(user: &User) -> Resource {
    let profile = match json!({
        "user_uid": user.user_uid,
        "first_name": user.first_name,
        "last_name": user.last_name,
        "email": user.email,
        "designation": user.designation,
        "emp_code": user.emp_code,
        "is_active": user.is_active,
        "is_deleted": user.is_deleted,
        "created_at": user.created_at,
        "updated_at": user.updated_at,
    }) {
        Value::Object(profile) => profile,
        _ => Map::new(),
    };

    Resource::new(
        ResourceId::user(user.user_uid.clone()),
        user.display_name(),
        profile,
    )
    .with_user_trait(UserTrait {
        status: UserStatus::from_flags(user.is_active, user.is_deleted),
        login: user.email.clone(),
        email: user.email.clone(),
    })
}
