//! Application services and ports.

#![forbid(unsafe_code)]

mod access_role_cache;
mod access_role_syncer;
mod client_ports;
mod connector;
mod credentials;
mod resource_syncer;
mod role_syncer;
mod sync_context;
mod sync_cycle;
mod team_syncer;
mod user_syncer;

#[cfg(test)]
mod test_support;

pub use access_role_cache::{AccessRoleCache, DEFAULT_ACCESS_ROLE_TTL};
pub use access_role_syncer::AccessRoleSyncer;
pub use client_ports::{
    AccessRoleAssignmentClient, AccountClient, Annotated, Paged, RoleAssignmentClient, TeamClient,
    UserDirectory, ZuperApi,
};
pub use connector::{
    AccountCreation, CONNECTOR_DESCRIPTION, CONNECTOR_DISPLAY_NAME, ConnectorMetadata,
    ConnectorSettings, PlaintextCredential, ZuperConnector,
};
pub use credentials::generate_password;
pub use resource_syncer::{
    GrantOutcome, GrantStatus, Page, ResourceProvisioner, ResourceSyncer, RevokeOutcome,
    RevokeStatus,
};
pub use role_syncer::RoleSyncer;
pub use sync_context::SyncContext;
pub use sync_cycle::{ResourceTypeSummary, SyncSummary, run_sync_cycle};
pub use team_syncer::TeamSyncer;
pub use user_syncer::UserSyncer;
