//! Connector facade: metadata, syncer registry, validation and account creation.

use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;
use zuper_core::{AppError, AppResult};
use zuper_domain::{
    AccountCreationSchema, AccountProfile, Annotations, CredentialCapability, CredentialOption,
    CredentialOptions, DEFAULT_PAGE_SIZE, NewUser, PROVISIONED_DESIGNATION, PageOptions,
    Resource, ResourceTypeId, Role, User,
};

use crate::access_role_cache::DEFAULT_ACCESS_ROLE_TTL;
use crate::credentials::generate_password;
use crate::user_syncer::user_resource;
use crate::{
    AccessRoleCache, AccessRoleSyncer, AccountClient, ResourceProvisioner, ResourceSyncer,
    RoleSyncer, SyncContext, TeamSyncer, UserDirectory, UserSyncer, ZuperApi,
};

/// Connector name shown to the host.
pub const CONNECTOR_DISPLAY_NAME: &str = "Zuper";

/// Connector description shown to the host.
pub const CONNECTOR_DESCRIPTION: &str = "Connector syncs data users, teams and create users of Zuper";

/// Static description of the connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectorMetadata {
    /// Display name.
    pub display_name: &'static str,
    /// Description.
    pub description: &'static str,
    /// Account creation form.
    pub account_creation_schema: AccountCreationSchema,
}

/// Tunables of a connector instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectorSettings {
    /// Freshness window of the access-role cache.
    pub access_role_ttl: Duration,
    /// Page size used when walking users to refresh the access-role cache.
    pub refresh_page_size: u32,
}

impl Default for ConnectorSettings {
    fn default() -> Self {
        Self {
            access_role_ttl: DEFAULT_ACCESS_ROLE_TTL,
            refresh_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Password handed back once after account creation.
#[derive(Clone, PartialEq, Eq)]
pub struct PlaintextCredential(String);

impl PlaintextCredential {
    /// Returns the secret value.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for PlaintextCredential {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("PlaintextCredential(<redacted>)")
    }
}

/// Result of [`ZuperConnector::create_account`].
#[derive(Debug, Clone)]
pub struct AccountCreation {
    /// Resource describing the new user.
    pub resource: Resource,
    /// Generated password; never stored by the connector.
    pub credential: PlaintextCredential,
    /// Side-channel metadata from the upstream call.
    pub annotations: Annotations,
}

/// Entry point wiring the syncers to one API client.
#[derive(Clone)]
pub struct ZuperConnector {
    directory: Arc<dyn UserDirectory>,
    accounts: Arc<dyn AccountClient>,
    users: Arc<UserSyncer>,
    roles: Arc<RoleSyncer>,
    access_roles: Arc<AccessRoleSyncer>,
    teams: Arc<TeamSyncer>,
}

impl ZuperConnector {
    /// Creates a connector with default settings.
    #[must_use]
    pub fn new<C>(client: Arc<C>) -> Self
    where
        C: ZuperApi + 'static,
    {
        Self::with_settings(client, ConnectorSettings::default())
    }

    /// Creates a connector with explicit settings.
    #[must_use]
    pub fn with_settings<C>(client: Arc<C>, settings: ConnectorSettings) -> Self
    where
        C: ZuperApi + 'static,
    {
        let cache = Arc::new(AccessRoleCache::new(settings.access_role_ttl));

        Self {
            directory: client.clone(),
            accounts: client.clone(),
            users: Arc::new(UserSyncer::new(client.clone(), Arc::clone(&cache))),
            roles: Arc::new(RoleSyncer::new(client.clone())),
            access_roles: Arc::new(
                AccessRoleSyncer::new(client.clone(), cache)
                    .with_refresh_page_size(settings.refresh_page_size),
            ),
            teams: Arc::new(TeamSyncer::new(client)),
        }
    }

    /// Returns the connector description and account creation schema.
    #[must_use]
    pub fn metadata(&self) -> ConnectorMetadata {
        ConnectorMetadata {
            display_name: CONNECTOR_DISPLAY_NAME,
            description: CONNECTOR_DESCRIPTION,
            account_creation_schema: AccountCreationSchema::zuper(),
        }
    }

    /// Returns every syncer in sync order.
    #[must_use]
    pub fn syncers(&self) -> Vec<Arc<dyn ResourceSyncer>> {
        ResourceTypeId::all()
            .iter()
            .map(|resource_type| self.syncer(*resource_type))
            .collect()
    }

    /// Returns the syncer for one resource type.
    #[must_use]
    pub fn syncer(&self, resource_type: ResourceTypeId) -> Arc<dyn ResourceSyncer> {
        match resource_type {
            ResourceTypeId::User => self.users.clone(),
            ResourceTypeId::Role => self.roles.clone(),
            ResourceTypeId::AccessRole => self.access_roles.clone(),
            ResourceTypeId::Team => self.teams.clone(),
        }
    }

    /// Returns the provisioner for a resource type. Users have none.
    #[must_use]
    pub fn provisioner(
        &self,
        resource_type: ResourceTypeId,
    ) -> Option<Arc<dyn ResourceProvisioner>> {
        match resource_type {
            ResourceTypeId::User => None,
            ResourceTypeId::Role => Some(self.roles.clone()),
            ResourceTypeId::AccessRole => Some(self.access_roles.clone()),
            ResourceTypeId::Team => Some(self.teams.clone()),
        }
    }

    /// Checks that the configured credentials can read users.
    pub async fn validate(&self, ctx: &SyncContext) -> AppResult<Annotations> {
        let page = self
            .directory
            .list_users(ctx, &PageOptions::new(String::new(), 1))
            .await?;
        info!("zuper credentials validated");

        Ok(page.annotations)
    }

    /// Credential options accepted by [`Self::create_account`].
    #[must_use]
    pub fn create_account_capability_details(&self) -> CredentialCapability {
        CredentialCapability {
            supported: vec![CredentialOption::RandomPassword],
            preferred: CredentialOption::RandomPassword,
        }
    }

    /// Creates a field executive account and returns its generated password.
    pub async fn create_account(
        &self,
        ctx: &SyncContext,
        profile: &Map<String, Value>,
        credential_options: &CredentialOptions,
    ) -> AppResult<AccountCreation> {
        let profile = AccountProfile::from_profile(profile)?;
        if credential_options.option != CredentialOption::RandomPassword {
            return Err(AppError::Validation(format!(
                "unsupported credential option {:?}; only random passwords are supported",
                credential_options.option
            )));
        }

        let password = generate_password(credential_options.length)?;
        let new_user = NewUser {
            first_name: profile.first_name.into(),
            last_name: profile.last_name.into(),
            email: profile.email.into(),
            password: password.clone(),
            designation: PROVISIONED_DESIGNATION.to_owned(),
            emp_code: profile.emp_code.into(),
            role_id: Role::DEFAULT.id().to_string(),
        };

        let created = self.accounts.create_user(ctx, &new_user).await?;
        info!(user_uid = %created.value.user_uid, email = %new_user.email, "account created");

        let user = User {
            user_uid: created.value.user_uid,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            email: new_user.email,
            designation: new_user.designation,
            emp_code: new_user.emp_code,
            is_active: true,
            ..User::default()
        };

        Ok(AccountCreation {
            resource: user_resource(&user),
            credential: PlaintextCredential(password),
            annotations: created.annotations,
        })
    }
}
