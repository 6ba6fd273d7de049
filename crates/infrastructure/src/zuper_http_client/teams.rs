use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;
use zuper_application::{Annotated, Paged, SyncContext, TeamClient};
use zuper_core::AppResult;
use zuper_domain::{MutationReceipt, PageOptions, Team, TeamMembership};

use super::ZuperHttpClient;
use super::wire::{TeamAssignmentRequest, TeamDetailEnvelope};

impl ZuperHttpClient {
    async fn change_membership(
        &self,
        ctx: &SyncContext,
        action: &str,
        team_uid: &str,
        user_uid: &str,
    ) -> AppResult<Annotated<MutationReceipt>> {
        let url = self.endpoint(&["api", "team", action])?;
        let body = TeamAssignmentRequest { team_uid, user_uid };
        debug!(action, team_uid, user_uid, "changing zuper team membership");

        self.mutate(ctx, action, Method::POST, url, &body).await
    }
}

#[async_trait]
impl TeamClient for ZuperHttpClient {
    async fn list_teams(
        &self,
        ctx: &SyncContext,
        options: &PageOptions,
    ) -> AppResult<Paged<Team>> {
        self.list(ctx, "list teams", &["api", "teams", "summary"], options)
            .await
    }

    async fn get_team(
        &self,
        ctx: &SyncContext,
        team_uid: &str,
    ) -> AppResult<Annotated<TeamMembership>> {
        let url = self.endpoint(&["api", "team", team_uid])?;
        let response: Annotated<TeamDetailEnvelope> = self.get(ctx, "get team", url).await?;

        Ok(Annotated::new(response.value.data, response.annotations))
    }

    async fn assign_user_to_team(
        &self,
        ctx: &SyncContext,
        team_uid: &str,
        user_uid: &str,
    ) -> AppResult<Annotated<MutationReceipt>> {
        self.change_membership(ctx, "assign", team_uid, user_uid)
            .await
    }

    async fn unassign_user_from_team(
        &self,
        ctx: &SyncContext,
        team_uid: &str,
        user_uid: &str,
    ) -> AppResult<Annotated<MutationReceipt>> {
        self.change_membership(ctx, "unassign", team_uid, user_uid)
            .await
    }
}
