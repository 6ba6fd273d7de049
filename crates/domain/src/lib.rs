//! Domain records, identity graph types and invariants.

#![forbid(unsafe_code)]

mod account;
mod annotations;
mod graph;
pub mod pagination;
mod role;
mod team;
mod user;

pub use account::{
    AccountCreationField, AccountCreationSchema, AccountProfile, CredentialCapability,
    CredentialOption, CredentialOptions, MIN_GENERATED_PASSWORD_LENGTH, PROVISIONED_DESIGNATION,
};
pub use annotations::{Annotation, Annotations, RateLimitDescription, RateLimitStatus};
pub use graph::{
    ASSIGNED_ENTITLEMENT, Entitlement, Grant, MEMBER_ENTITLEMENT, Resource, ResourceId,
    ResourceTrait, ResourceType, ResourceTypeId, UserStatus, UserTrait, entitlement_id,
};
pub use pagination::{DEFAULT_PAGE_SIZE, PageCursor, PageOptions, PageToken};
pub use role::{Role, RoleDefinition};
pub use team::{Team, TeamCreator, TeamMembership};
pub use user::{AccessRole, CreatedUser, MutationReceipt, NewUser, User, UserRoleRef};
