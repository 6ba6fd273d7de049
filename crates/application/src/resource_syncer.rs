//! Host-facing contracts implemented by each resource type.

use async_trait::async_trait;
use zuper_core::{AppError, AppResult};
use zuper_domain::{
    Annotations, Entitlement, Grant, PageToken, Resource, ResourceId, ResourceType, ResourceTypeId,
};

use crate::SyncContext;

/// One page of graph objects returned to the host.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items in upstream order.
    pub items: Vec<T>,
    /// Continuation token; empty when the listing is complete.
    pub next_token: String,
    /// Side-channel metadata such as rate-limit status.
    pub annotations: Annotations,
}

impl<T> Page<T> {
    /// Creates a page.
    #[must_use]
    pub fn new(items: Vec<T>, next_token: impl Into<String>, annotations: Annotations) -> Self {
        Self {
            items,
            next_token: next_token.into(),
            annotations,
        }
    }

    /// Single final page without annotations.
    #[must_use]
    pub fn complete(items: Vec<T>) -> Self {
        Self::new(items, String::new(), Annotations::new())
    }

    /// Final page with no items.
    #[must_use]
    pub fn empty() -> Self {
        Self::complete(Vec::new())
    }
}

/// Read side of a resource type: List, Entitlements and Grants.
#[async_trait]
pub trait ResourceSyncer: Send + Sync {
    /// Resource type served by this syncer.
    fn resource_type(&self) -> ResourceType;

    /// Lists one page of resources.
    async fn list(
        &self,
        ctx: &SyncContext,
        parent: Option<&ResourceId>,
        token: &PageToken,
    ) -> AppResult<Page<Resource>>;

    /// Lists the entitlements a resource exposes.
    async fn entitlements(
        &self,
        ctx: &SyncContext,
        resource: &Resource,
        token: &PageToken,
    ) -> AppResult<Page<Entitlement>>;

    /// Lists one page of grants on a resource.
    async fn grants(
        &self,
        ctx: &SyncContext,
        resource: &Resource,
        token: &PageToken,
    ) -> AppResult<Page<Grant>>;
}

/// Result kind of a grant request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantStatus {
    /// Upstream state was changed.
    Granted,
    /// The principal already held the entitlement.
    AlreadyExists,
}

/// Outcome of [`ResourceProvisioner::grant`].
#[derive(Debug, Clone, PartialEq)]
pub struct GrantOutcome {
    /// Whether a mutation happened.
    pub status: GrantStatus,
    /// Grants that now exist as a result of the call.
    pub grants: Vec<Grant>,
    /// Side-channel metadata.
    pub annotations: Annotations,
}

impl GrantOutcome {
    /// Outcome for an entitlement the principal already holds.
    #[must_use]
    pub fn already_exists(annotations: Annotations) -> Self {
        Self {
            status: GrantStatus::AlreadyExists,
            grants: Vec::new(),
            annotations,
        }
    }

    /// Outcome for a successful mutation.
    #[must_use]
    pub fn granted(grant: Grant, annotations: Annotations) -> Self {
        Self {
            status: GrantStatus::Granted,
            grants: vec![grant],
            annotations,
        }
    }
}

/// Result kind of a revoke request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevokeStatus {
    /// Upstream state was changed.
    Revoked,
    /// Nothing to remove.
    AlreadyRevoked,
}

/// Outcome of [`ResourceProvisioner::revoke`].
#[derive(Debug, Clone, PartialEq)]
pub struct RevokeOutcome {
    /// Whether a mutation happened.
    pub status: RevokeStatus,
    /// Side-channel metadata.
    pub annotations: Annotations,
}

impl RevokeOutcome {
    /// Outcome for a grant that no longer exists upstream.
    #[must_use]
    pub fn already_revoked(annotations: Annotations) -> Self {
        Self {
            status: RevokeStatus::AlreadyRevoked,
            annotations,
        }
    }

    /// Outcome for a successful mutation.
    #[must_use]
    pub fn revoked(annotations: Annotations) -> Self {
        Self {
            status: RevokeStatus::Revoked,
            annotations,
        }
    }
}

/// Write side of a resource type: Grant and Revoke.
#[async_trait]
pub trait ResourceProvisioner: Send + Sync {
    /// Grants `entitlement` to `principal`.
    async fn grant(
        &self,
        ctx: &SyncContext,
        principal: &ResourceId,
        entitlement: &Entitlement,
    ) -> AppResult<GrantOutcome>;

    /// Removes an existing grant.
    async fn revoke(&self, ctx: &SyncContext, grant: &Grant) -> AppResult<RevokeOutcome>;
}

/// Rejects principals that are not users.
pub(crate) fn require_user_principal(principal: &ResourceId) -> AppResult<&str> {
    if principal.resource_type != ResourceTypeId::User {
        return Err(AppError::Validation(format!(
            "only users can be granted entitlements, got principal '{principal}'"
        )));
    }

    Ok(principal.resource.as_str())
}
