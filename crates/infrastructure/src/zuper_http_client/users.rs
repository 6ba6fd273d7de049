use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;
use zuper_application::{
    AccessRoleAssignmentClient, AccountClient, Annotated, Paged, RoleAssignmentClient,
    SyncContext, UserDirectory,
};
use zuper_core::{AppError, AppResult};
use zuper_domain::{CreatedUser, MutationReceipt, NewUser, PageOptions, User};

use super::ZuperHttpClient;
use super::wire::{
    AccessRoleUpdate, CreateUserEnvelope, CreateUserRequest, RoleUpdate, UserDetailEnvelope,
    UserUpdateRequest, default_work_hours,
};

#[async_trait]
impl UserDirectory for ZuperHttpClient {
    async fn list_users(
        &self,
        ctx: &SyncContext,
        options: &PageOptions,
    ) -> AppResult<Paged<User>> {
        self.list(ctx, "list users", &["api", "user", "all"], options)
            .await
    }

    async fn get_user(&self, ctx: &SyncContext, user_uid: &str) -> AppResult<Annotated<User>> {
        let url = self.endpoint(&["api", "user", user_uid])?;
        let response: Annotated<UserDetailEnvelope> = self.get(ctx, "get user", url).await?;

        Ok(Annotated::new(response.value.data, response.annotations))
    }
}

#[async_trait]
impl AccountClient for ZuperHttpClient {
    async fn create_user(
        &self,
        ctx: &SyncContext,
        user: &NewUser,
    ) -> AppResult<Annotated<CreatedUser>> {
        let url = self.endpoint(&["api", "user"])?;
        let request = CreateUserRequest {
            work_hours: default_work_hours(),
            user,
        };
        let response: Annotated<CreateUserEnvelope> = self
            .send_json(ctx, "create user", Method::POST, url, &request)
            .await?;
        let envelope = response.value;
        if envelope.data.user_uid.is_empty() {
            return Err(AppError::Upstream {
                status: 200,
                kind: "decode".to_owned(),
                title: "create user returned no user uid".to_owned(),
                message: envelope.message,
            });
        }
        debug!(user_uid = %envelope.data.user_uid, "created zuper user");

        Ok(Annotated::new(
            CreatedUser {
                user_uid: envelope.data.user_uid,
                message: envelope.message,
            },
            response.annotations,
        ))
    }
}

#[async_trait]
impl RoleAssignmentClient for ZuperHttpClient {
    async fn update_user_role(
        &self,
        ctx: &SyncContext,
        user_uid: &str,
        role_id: u8,
    ) -> AppResult<Annotated<MutationReceipt>> {
        let url = self.endpoint(&["api", "user", user_uid, "update"])?;
        let body = UserUpdateRequest {
            user: RoleUpdate { role_id },
        };

        self.mutate(ctx, "update user role", Method::PUT, url, &body)
            .await
    }
}

#[async_trait]
impl AccessRoleAssignmentClient for ZuperHttpClient {
    async fn update_user_access_role(
        &self,
        ctx: &SyncContext,
        user_uid: &str,
        access_role_uid: &str,
    ) -> AppResult<Annotated<MutationReceipt>> {
        let url = self.endpoint(&["api", "user", user_uid, "update"])?;
        let body = UserUpdateRequest {
            user: AccessRoleUpdate { access_role_uid },
        };

        self.mutate(ctx, "update user access role", Method::PUT, url, &body)
            .await
    }
}
