//! Access-role resources backed by [`AccessRoleCache`], and their provisioning.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::info;
use zuper_core::AppResult;
use zuper_domain::{
    ASSIGNED_ENTITLEMENT, AccessRole, DEFAULT_PAGE_SIZE, Entitlement, Grant, PageOptions,
    PageToken, Resource, ResourceId, ResourceType, ResourceTypeId,
};

use crate::resource_syncer::require_user_principal;
use crate::{
    AccessRoleAssignmentClient, AccessRoleCache, GrantOutcome, Page, ResourceProvisioner,
    ResourceSyncer, RevokeOutcome, SyncContext,
};

/// Syncer and provisioner for access roles.
pub struct AccessRoleSyncer {
    client: Arc<dyn AccessRoleAssignmentClient>,
    cache: Arc<AccessRoleCache>,
    refresh_page_size: u32,
}

impl AccessRoleSyncer {
    /// Creates an access-role syncer owning `cache`.
    #[must_use]
    pub fn new(client: Arc<dyn AccessRoleAssignmentClient>, cache: Arc<AccessRoleCache>) -> Self {
        Self {
            client,
            cache,
            refresh_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Overrides the page size used while refreshing the cache.
    #[must_use]
    pub fn with_refresh_page_size(mut self, page_size: u32) -> Self {
        self.refresh_page_size = page_size;
        self
    }
}

#[async_trait]
impl ResourceSyncer for AccessRoleSyncer {
    fn resource_type(&self) -> ResourceType {
        ResourceTypeId::AccessRole.descriptor()
    }

    async fn list(
        &self,
        ctx: &SyncContext,
        _parent: Option<&ResourceId>,
        _token: &PageToken,
    ) -> AppResult<Page<Resource>> {
        let annotations = self
            .cache
            .ensure_fresh(ctx, self.client.as_ref(), self.refresh_page_size)
            .await?;
        let resources = self
            .cache
            .snapshot()
            .await
            .iter()
            .map(access_role_resource)
            .collect();

        Ok(Page::new(resources, String::new(), annotations))
    }

    async fn entitlements(
        &self,
        ctx: &SyncContext,
        resource: &Resource,
        _token: &PageToken,
    ) -> AppResult<Page<Entitlement>> {
        let annotations = self
            .cache
            .ensure_fresh(ctx, self.client.as_ref(), self.refresh_page_size)
            .await?;
        let name = &resource.display_name;
        let entitlement = Entitlement::assignment(
            resource.clone(),
            ASSIGNED_ENTITLEMENT,
            format!("{name} access role {ASSIGNED_ENTITLEMENT}"),
            format!("{ASSIGNED_ENTITLEMENT} to {name} access role"),
        );

        Ok(Page::new(vec![entitlement], String::new(), annotations))
    }

    async fn grants(
        &self,
        ctx: &SyncContext,
        resource: &Resource,
        token: &PageToken,
    ) -> AppResult<Page<Grant>> {
        let page = self
            .client
            .list_users(ctx, &PageOptions::from_host(token))
            .await?;
        self.cache.observe(&page.items).await;

        let grants = page
            .items
            .iter()
            .filter(|user| {
                user.assigned_access_role()
                    .is_some_and(|access_role| access_role.access_role_uid == resource.id.resource)
            })
            .map(|user| {
                Grant::new(
                    resource.clone(),
                    ASSIGNED_ENTITLEMENT,
                    ResourceId::user(user.user_uid.clone()),
                )
            })
            .collect();

        Ok(Page::new(grants, page.next_token, page.annotations))
    }
}

#[async_trait]
impl ResourceProvisioner for AccessRoleSyncer {
    async fn grant(
        &self,
        ctx: &SyncContext,
        principal: &ResourceId,
        entitlement: &Entitlement,
    ) -> AppResult<GrantOutcome> {
        let user_uid = require_user_principal(principal)?;
        let access_role_uid = entitlement.resource.id.resource.as_str();

        let user = self.client.get_user(ctx, user_uid).await?;
        let held = user
            .value
            .assigned_access_role()
            .is_some_and(|access_role| access_role.access_role_uid == access_role_uid);
        if held {
            info!(user_uid, access_role_uid, "access role already granted");
            return Ok(GrantOutcome::already_exists(user.annotations));
        }

        let receipt = self
            .client
            .update_user_access_role(ctx, user_uid, access_role_uid)
            .await?;
        info!(user_uid, access_role_uid, "access role granted");

        let mut annotations = user.annotations;
        annotations.merge(receipt.annotations);
        let grant = Grant::for_entitlement(entitlement.clone(), principal.clone())
            .with_metadata("message", receipt.value.message);

        Ok(GrantOutcome::granted(grant, annotations))
    }

    async fn revoke(&self, ctx: &SyncContext, grant: &Grant) -> AppResult<RevokeOutcome> {
        let user_uid = require_user_principal(&grant.principal)?;
        let access_role_uid = grant.entitlement.resource.id.resource.as_str();

        let user = self.client.get_user(ctx, user_uid).await?;
        let held = user
            .value
            .assigned_access_role()
            .is_some_and(|access_role| access_role.access_role_uid == access_role_uid);
        if !held {
            info!(user_uid, access_role_uid, "access role already revoked");
            return Ok(RevokeOutcome::already_revoked(user.annotations));
        }

        let receipt = self
            .client
            .update_user_access_role(ctx, user_uid, "")
            .await?;
        info!(user_uid, access_role_uid, "access role revoked");

        let mut annotations = user.annotations;
        annotations.merge(receipt.annotations);
        Ok(RevokeOutcome::revoked(annotations))
    }
}

fn access_role_resource(access_role: &AccessRole) -> Resource {
    let mut profile = Map::new();
    profile.insert(
        "access_role_uid".to_owned(),
        Value::from(access_role.access_role_uid.clone()),
    );
    profile.insert(
        "role_description".to_owned(),
        Value::from(access_role.description.clone()),
    );

    Resource::new(
        ResourceId::new(
            ResourceTypeId::AccessRole,
            access_role.access_role_uid.clone(),
        ),
        access_role.name.clone(),
        profile,
    )
}
