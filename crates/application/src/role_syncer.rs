//! Built-in role resources and role provisioning.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::info;
use zuper_core::AppResult;
use zuper_domain::{
    ASSIGNED_ENTITLEMENT, Entitlement, Grant, PageOptions, PageToken, Resource, ResourceId,
    ResourceType, ResourceTypeId, Role, RoleDefinition, User,
};

use crate::resource_syncer::require_user_principal;
use crate::{
    GrantOutcome, Page, ResourceProvisioner, ResourceSyncer, RevokeOutcome, RoleAssignmentClient,
    SyncContext,
};

/// Syncer and provisioner for the closed set of Zuper roles.
pub struct RoleSyncer {
    client: Arc<dyn RoleAssignmentClient>,
}

impl RoleSyncer {
    /// Creates a role syncer.
    #[must_use]
    pub fn new(client: Arc<dyn RoleAssignmentClient>) -> Self {
        Self { client }
    }
}

fn holds_role(user: &User, definition: &RoleDefinition) -> bool {
    user.role.as_ref().is_some_and(|role| {
        role.role_key == definition.key || role.role_uid == definition.id.to_string()
    })
}

#[async_trait]
impl ResourceSyncer for RoleSyncer {
    fn resource_type(&self) -> ResourceType {
        ResourceTypeId::Role.descriptor()
    }

    async fn list(
        &self,
        _ctx: &SyncContext,
        _parent: Option<&ResourceId>,
        _token: &PageToken,
    ) -> AppResult<Page<Resource>> {
        Ok(Page::complete(
            Role::definitions().iter().map(role_resource).collect(),
        ))
    }

    async fn entitlements(
        &self,
        _ctx: &SyncContext,
        resource: &Resource,
        _token: &PageToken,
    ) -> AppResult<Page<Entitlement>> {
        let display_name = resource.display_name.clone();
        Ok(Page::complete(vec![Entitlement::assignment(
            resource.clone(),
            ASSIGNED_ENTITLEMENT,
            format!("{display_name} role {ASSIGNED_ENTITLEMENT}"),
            format!("{ASSIGNED_ENTITLEMENT} to {display_name} role"),
        )]))
    }

    async fn grants(
        &self,
        ctx: &SyncContext,
        resource: &Resource,
        token: &PageToken,
    ) -> AppResult<Page<Grant>> {
        let definition = Role::from_str(&resource.id.resource)?.definition();
        let page = self
            .client
            .list_users(ctx, &PageOptions::from_host(token))
            .await?;

        let grants = page
            .items
            .iter()
            .filter(|user| user.role_key() == Some(definition.key))
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
impl ResourceProvisioner for RoleSyncer {
    async fn grant(
        &self,
        ctx: &SyncContext,
        principal: &ResourceId,
        entitlement: &Entitlement,
    ) -> AppResult<GrantOutcome> {
        let user_uid = require_user_principal(principal)?;
        let definition = Role::from_str(&entitlement.resource.id.resource)?.definition();

        let user = self.client.get_user(ctx, user_uid).await?;
        if holds_role(&user.value, definition) {
            info!(user_uid, role = definition.key, "role already granted");
            return Ok(GrantOutcome::already_exists(user.annotations));
        }

        let receipt = self
            .client
            .update_user_role(ctx, user_uid, definition.id)
            .await?;
        info!(user_uid, role = definition.key, "role granted");

        let mut annotations = user.annotations;
        annotations.merge(receipt.annotations);
        let grant = Grant::for_entitlement(entitlement.clone(), principal.clone())
            .with_metadata("message", receipt.value.message);

        Ok(GrantOutcome::granted(grant, annotations))
    }

    async fn revoke(&self, ctx: &SyncContext, grant: &Grant) -> AppResult<RevokeOutcome> {
        let user_uid = require_user_principal(&grant.principal)?;
        let revoked = Role::from_str(&grant.entitlement.resource.id.resource)?;

        let user = self.client.get_user(ctx, user_uid).await?;
        let default = Role::DEFAULT.definition();
        if holds_role(&user.value, default) || !holds_role(&user.value, revoked.definition()) {
            info!(user_uid, role = revoked.key(), "role already revoked");
            return Ok(RevokeOutcome::already_revoked(user.annotations));
        }

        let receipt = self
            .client
            .update_user_role(ctx, user_uid, default.id)
            .await?;
        info!(
            user_uid,
            role = revoked.key(),
            fallback = default.key,
            "role revoked"
        );

        let mut annotations = user.annotations;
        annotations.merge(receipt.annotations);
        Ok(RevokeOutcome::revoked(annotations))
    }
}

fn role_resource(definition: &RoleDefinition) -> Resource {
    let mut profile = Map::new();
    profile.insert("role_id".to_owned(), Value::from(definition.id.to_string()));
    profile.insert("role_key".to_owned(), Value::from(definition.key));
    profile.insert(
        "role_display".to_owned(),
        Value::from(definition.display_name),
    );
    profile.insert(
        "role_description".to_owned(),
        Value::from(definition.description),
    );

    Resource::new(
        ResourceId::new(ResourceTypeId::Role, definition.key),
        definition.display_name,
        profile,
    )
}

#[cfg(test)]
mod tests;
