//! Capability ports the syncers use to talk to the Zuper API.
//!
//! Each syncer depends only on the narrow port it needs, so tests can supply
//! a small fake instead of a full HTTP client.

use async_trait::async_trait;
use zuper_core::AppResult;
use zuper_domain::{
    Annotations, CreatedUser, MutationReceipt, NewUser, PageOptions, Team, TeamMembership, User,
};

use crate::SyncContext;

/// One page of upstream records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paged<T> {
    /// Records in upstream order.
    pub items: Vec<T>,
    /// Token for the next page; empty on the last page.
    pub next_token: String,
    /// Side-channel metadata from the response.
    pub annotations: Annotations,
}

impl<T> Paged<T> {
    /// Creates a page.
    #[must_use]
    pub fn new(items: Vec<T>, next_token: impl Into<String>, annotations: Annotations) -> Self {
        Self {
            items,
            next_token: next_token.into(),
            annotations,
        }
    }
}

/// Single upstream value with response annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotated<T> {
    /// Response value.
    pub value: T,
    /// Side-channel metadata from the response.
    pub annotations: Annotations,
}

impl<T> Annotated<T> {
    /// Wraps a value.
    #[must_use]
    pub fn new(value: T, annotations: Annotations) -> Self {
        Self { value, annotations }
    }
}

/// Read access to users.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Lists one page of users.
    async fn list_users(&self, ctx: &SyncContext, options: &PageOptions)
    -> AppResult<Paged<User>>;

    /// Fetches one user by uid.
    async fn get_user(&self, ctx: &SyncContext, user_uid: &str) -> AppResult<Annotated<User>>;
}

/// User creation.
#[async_trait]
pub trait AccountClient: Send + Sync {
    /// Creates a user with the default work-hours block.
    async fn create_user(
        &self,
        ctx: &SyncContext,
        user: &NewUser,
    ) -> AppResult<Annotated<CreatedUser>>;
}

/// Role assignment on top of user reads.
#[async_trait]
pub trait RoleAssignmentClient: UserDirectory {
    /// Sets the role of a user by numeric role id.
    async fn update_user_role(
        &self,
        ctx: &SyncContext,
        user_uid: &str,
        role_id: u8,
    ) -> AppResult<Annotated<MutationReceipt>>;
}

/// Access-role assignment on top of user reads.
#[async_trait]
pub trait AccessRoleAssignmentClient: UserDirectory {
    /// Sets the access role of a user. An empty uid clears it.
    async fn update_user_access_role(
        &self,
        ctx: &SyncContext,
        user_uid: &str,
        access_role_uid: &str,
    ) -> AppResult<Annotated<MutationReceipt>>;
}

/// Teams and team membership.
#[async_trait]
pub trait TeamClient: Send + Sync {
    /// Lists one page of teams.
    async fn list_teams(&self, ctx: &SyncContext, options: &PageOptions)
    -> AppResult<Paged<Team>>;

    /// Fetches a team together with its members.
    async fn get_team(&self, ctx: &SyncContext, team_uid: &str)
    -> AppResult<Annotated<TeamMembership>>;

    /// Adds a user to a team.
    async fn assign_user_to_team(
        &self,
        ctx: &SyncContext,
        team_uid: &str,
        user_uid: &str,
    ) -> AppResult<Annotated<MutationReceipt>>;

    /// Removes a user from a team.
    async fn unassign_user_from_team(
        &self,
        ctx: &SyncContext,
        team_uid: &str,
        user_uid: &str,
    ) -> AppResult<Annotated<MutationReceipt>>;

    /// Returns whether `user_uid` currently belongs to `team_uid`.
    async fn is_user_in_team(
        &self,
        ctx: &SyncContext,
        team_uid: &str,
        user_uid: &str,
    ) -> AppResult<Annotated<bool>> {
        let team = self.get_team(ctx, team_uid).await?;
        Ok(Annotated::new(
            team.value.contains(user_uid),
            team.annotations,
        ))
    }
}

/// Every capability the connector needs, implemented by the HTTP client.
pub trait ZuperApi:
    AccountClient + RoleAssignmentClient + AccessRoleAssignmentClient + TeamClient
{
}

impl<T> ZuperApi for T where
    T: AccountClient + RoleAssignmentClient + AccessRoleAssignmentClient + TeamClient
{
}
