//! Team resources and team membership provisioning.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tracing::info;
use zuper_core::AppResult;
use zuper_domain::{
    Entitlement, Grant, MEMBER_ENTITLEMENT, PageOptions, PageToken, Resource, ResourceId,
    ResourceType, ResourceTypeId, Team,
};

use crate::resource_syncer::require_user_principal;
use crate::{
    GrantOutcome, Page, ResourceProvisioner, ResourceSyncer, RevokeOutcome, SyncContext,
    TeamClient,
};

/// Syncer and provisioner for teams.
pub struct TeamSyncer {
    client: Arc<dyn TeamClient>,
}

impl TeamSyncer {
    /// Creates a team syncer.
    #[must_use]
    pub fn new(client: Arc<dyn TeamClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceSyncer for TeamSyncer {
    fn resource_type(&self) -> ResourceType {
        ResourceTypeId::Team.descriptor()
    }

    async fn list(
        &self,
        ctx: &SyncContext,
        _parent: Option<&ResourceId>,
        token: &PageToken,
    ) -> AppResult<Page<Resource>> {
        let page = self
            .client
            .list_teams(ctx, &PageOptions::from_host(token))
            .await?;

        Ok(Page::new(
            page.items.iter().map(team_resource).collect(),
            page.next_token,
            page.annotations,
        ))
    }

    async fn entitlements(
        &self,
        _ctx: &SyncContext,
        resource: &Resource,
        _token: &PageToken,
    ) -> AppResult<Page<Entitlement>> {
        let name = &resource.display_name;
        Ok(Page::complete(vec![Entitlement::assignment(
            resource.clone(),
            MEMBER_ENTITLEMENT,
            format!("Member of {name}"),
            format!("Member of team {name}"),
        )]))
    }

    async fn grants(
        &self,
        ctx: &SyncContext,
        resource: &Resource,
        _token: &PageToken,
    ) -> AppResult<Page<Grant>> {
        let team_uid = resource.id.resource.as_str();
        let membership = self.client.get_team(ctx, team_uid).await?;

        let grants = membership
            .value
            .members
            .iter()
            .map(|member| {
                Grant::new(
                    resource.clone(),
                    MEMBER_ENTITLEMENT,
                    ResourceId::user(member.user_uid.clone()),
                )
                .with_metadata("team_id", team_uid)
                .with_metadata("team_name", resource.display_name.clone())
                .with_metadata("user_id", member.user_uid.clone())
                .with_metadata("username", member.email.clone())
            })
            .collect();

        Ok(Page::new(grants, String::new(), membership.annotations))
    }
}

#[async_trait]
impl ResourceProvisioner for TeamSyncer {
    async fn grant(
        &self,
        ctx: &SyncContext,
        principal: &ResourceId,
        entitlement: &Entitlement,
    ) -> AppResult<GrantOutcome> {
        let user_uid = require_user_principal(principal)?;
        let team_uid = entitlement.resource.id.resource.as_str();

        let membership = self.client.is_user_in_team(ctx, team_uid, user_uid).await?;
        if membership.value {
            info!(team_uid, user_uid, "team membership already granted");
            return Ok(GrantOutcome::already_exists(membership.annotations));
        }

        let receipt = self
            .client
            .assign_user_to_team(ctx, team_uid, user_uid)
            .await?;
        info!(team_uid, user_uid, "team membership granted");

        let mut annotations = membership.annotations;
        annotations.merge(receipt.annotations);
        let grant = Grant::for_entitlement(entitlement.clone(), principal.clone())
            .with_metadata("team_id", team_uid)
            .with_metadata("user_id", user_uid)
            .with_metadata("message", receipt.value.message);

        Ok(GrantOutcome::granted(grant, annotations))
    }

    async fn revoke(&self, ctx: &SyncContext, grant: &Grant) -> AppResult<RevokeOutcome> {
        let user_uid = require_user_principal(&grant.principal)?;
        let team_uid = grant.entitlement.resource.id.resource.as_str();

        let membership = self.client.is_user_in_team(ctx, team_uid, user_uid).await?;
        if !membership.value {
            info!(team_uid, user_uid, "team membership already revoked");
            return Ok(RevokeOutcome::already_revoked(membership.annotations));
        }

        let receipt = self
            .client
            .unassign_user_from_team(ctx, team_uid, user_uid)
            .await?;
        info!(team_uid, user_uid, "team membership revoked");

        let mut annotations = membership.annotations;
        annotations.merge(receipt.annotations);
        Ok(RevokeOutcome::revoked(annotations))
    }
}

fn team_resource(team: &Team) -> Resource {
    let profile = match json!({
        "team_name": team.team_name,
        "team_color": team.team_color,
        "team_description": team.team_description,
        "team_timezone": team.team_timezone,
        "user_count": team.user_count,
        "is_active": team.is_active,
        "created_at": team.created_at,
        "updated_at": team.updated_at,
    }) {
        Value::Object(profile) => profile,
        _ => Map::new(),
    };

    Resource::new(
        ResourceId::new(ResourceTypeId::Team, team.team_uid.clone()),
        team.team_name.clone(),
        profile,
    )
}
