use std::sync::Arc;

use serde_json::Map;
use zuper_core::AppError;
use zuper_domain::{
    ASSIGNED_ENTITLEMENT, Entitlement, Grant, PageToken, Resource, ResourceId, ResourceTypeId,
    Role,
};

use crate::test_support::{Call, FakeZuperApi, user};
use crate::{GrantStatus, ResourceProvisioner, ResourceSyncer, RevokeStatus, SyncContext};

use super::RoleSyncer;

fn role_entitlement(key: &str) -> Entitlement {
    Entitlement::assignment(
        Resource::new(ResourceId::new(ResourceTypeId::Role, key), key, Map::new()),
        ASSIGNED_ENTITLEMENT,
        "",
        "",
    )
}

fn role_grant(key: &str, user_uid: &str) -> Grant {
    Grant::for_entitlement(role_entitlement(key), ResourceId::user(user_uid))
}

#[tokio::test]
async fn list_returns_static_roles_on_one_page() {
    let syncer = RoleSyncer::new(Arc::new(FakeZuperApi::default()));
    let ctx = SyncContext::new();

    let page = syncer
        .list(&ctx, None, &PageToken::default())
        .await
        .unwrap_or_else(|error| panic!("list failed: {error}"));

    let keys: Vec<_> = page
        .items
        .iter()
        .map(|resource| resource.id.resource.as_str())
        .collect();
    assert_eq!(keys, ["ADMIN", "TEAM_LEADER", "FIELD_EXECUTIVE"]);
    assert!(page.next_token.is_empty());
    assert_eq!(
        page.items[1].profile.get("role_id"),
        Some(&serde_json::json!("2"))
    );

    let entitlements = syncer
        .entitlements(&ctx, &page.items[0], &PageToken::default())
        .await
        .unwrap_or_else(|error| panic!("entitlements failed: {error}"));
    assert_eq!(entitlements.items.len(), 1);
    assert_eq!(entitlements.items[0].id, "role:ADMIN:assigned");
    assert_eq!(
        entitlements.items[0].display_name,
        "Administrator role assigned"
    );
    assert_eq!(
        entitlements.items[0].description,
        "assigned to Administrator role"
    );
}

#[tokio::test]
async fn grants_walk_one_user_page_per_call() {
    let syncer = RoleSyncer::new(Arc::new(FakeZuperApi::with_users(vec![
        user("a", Some(Role::Admin), None),
        user("b", Some(Role::FieldExecutive), None),
        user("c", Some(Role::Admin), None),
    ])));
    let ctx = SyncContext::new();
    let admin = role_entitlement("ADMIN").resource;

    let first = syncer
        .grants(&ctx, &admin, &PageToken::new("", 2))
        .await
        .unwrap_or_else(|error| panic!("grants failed: {error}"));
    assert_eq!(first.items.len(), 1);
    assert!(!first.next_token.is_empty());

    let second = syncer
        .grants(&ctx, &admin, &PageToken::new(first.next_token.clone(), 2))
        .await
        .unwrap_or_else(|error| panic!("grants failed: {error}"));
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.items[0].principal, ResourceId::user("c"));
    assert!(second.next_token.is_empty());
}

#[tokio::test]
async fn granting_held_role_is_already_exists_without_mutation() {
    let client = Arc::new(FakeZuperApi::with_users(vec![user(
        "a",
        Some(Role::Admin),
        None,
    )]));
    let syncer = RoleSyncer::new(client.clone());

    let outcome = syncer
        .grant(
            &SyncContext::new(),
            &ResourceId::user("a"),
            &role_entitlement("ADMIN"),
        )
        .await
        .unwrap_or_else(|error| panic!("grant failed: {error}"));

    assert_eq!(outcome.status, GrantStatus::AlreadyExists);
    assert!(outcome.grants.is_empty());
    assert!(client.calls().await.is_empty());
}

#[tokio::test]
async fn granting_new_role_issues_one_update() {
    let client = Arc::new(FakeZuperApi::with_users(vec![user(
        "a",
        Some(Role::FieldExecutive),
        None,
    )]));
    let syncer = RoleSyncer::new(client.clone());

    let outcome = syncer
        .grant(
            &SyncContext::new(),
            &ResourceId::user("a"),
            &role_entitlement("TEAM_LEADER"),
        )
        .await
        .unwrap_or_else(|error| panic!("grant failed: {error}"));

    assert_eq!(outcome.status, GrantStatus::Granted);
    assert_eq!(outcome.grants[0].id, "role:TEAM_LEADER:assigned:user:a");
    assert_eq!(
        outcome.grants[0].metadata.get("message"),
        Some(&serde_json::json!("User role updated"))
    );
    assert_eq!(
        client.calls().await,
        vec![Call::UpdateRole {
            user_uid: "a".to_owned(),
            role_id: 2
        }]
    );
}

#[tokio::test]
async fn unknown_role_key_is_a_validation_error() {
    let client = Arc::new(FakeZuperApi::with_users(vec![user("a", None, None)]));
    let syncer = RoleSyncer::new(client.clone());

    let result = syncer
        .grant(
            &SyncContext::new(),
            &ResourceId::user("a"),
            &role_entitlement("OWNER"),
        )
        .await;

    assert!(
        matches!(result, Err(AppError::Validation(message)) if message == "role ID not found for key: OWNER")
    );
    assert!(client.calls().await.is_empty());
}

#[tokio::test]
async fn non_user_principal_is_rejected() {
    let syncer = RoleSyncer::new(Arc::new(FakeZuperApi::default()));

    let result = syncer
        .grant(
            &SyncContext::new(),
            &ResourceId::new(ResourceTypeId::Team, "t1"),
            &role_entitlement("ADMIN"),
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn revoke_restores_default_role() {
    let client = Arc::new(FakeZuperApi::with_users(vec![user(
        "a",
        Some(Role::Admin),
        None,
    )]));
    let syncer = RoleSyncer::new(client.clone());

    let outcome = syncer
        .revoke(&SyncContext::new(), &role_grant("ADMIN", "a"))
        .await
        .unwrap_or_else(|error| panic!("revoke failed: {error}"));

    assert_eq!(outcome.status, RevokeStatus::Revoked);
    assert_eq!(
        client.calls().await,
        vec![Call::UpdateRole {
            user_uid: "a".to_owned(),
            role_id: 3
        }]
    );
    assert_eq!(
        client.user("a").await.and_then(|user| user.role_key().map(str::to_owned)),
        Some("FIELD_EXECUTIVE".to_owned())
    );
}

#[tokio::test]
async fn revoke_is_a_no_op_at_default_or_for_another_role() {
    let client = Arc::new(FakeZuperApi::with_users(vec![
        user("a", Some(Role::FieldExecutive), None),
        user("b", Some(Role::TeamLeader), None),
        user("c", None, None),
    ]));
    let syncer = RoleSyncer::new(client.clone());
    let ctx = SyncContext::new();

    for (key, user_uid) in [("FIELD_EXECUTIVE", "a"), ("ADMIN", "b"), ("ADMIN", "c")] {
        let outcome = syncer
            .revoke(&ctx, &role_grant(key, user_uid))
            .await
            .unwrap_or_else(|error| panic!("revoke failed: {error}"));
        assert_eq!(outcome.status, RevokeStatus::AlreadyRevoked);
    }

    assert!(client.calls().await.is_empty());
}
