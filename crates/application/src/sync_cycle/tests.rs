use std::sync::Arc;

use zuper_core::AppError;
use zuper_domain::{Annotation, Annotations, RateLimitDescription, RateLimitStatus, Role};

use crate::test_support::{FakeZuperApi, user};
use crate::{SyncContext, ZuperConnector};

use super::{ResourceTypeSummary, run_sync_cycle};

async fn populated(annotations: Annotations) -> Arc<FakeZuperApi> {
    let client = Arc::new(
        FakeZuperApi::with_users(vec![
            user("a", Some(Role::Admin), Some(("ar-1", "Dispatcher"))),
            user("b", Some(Role::FieldExecutive), None),
            user("c", None, Some(("ar-1", "Dispatcher"))),
        ])
        .with_annotations(annotations),
    );
    client.add_team("t1", "North", &["a", "b"]).await;
    client
}

#[tokio::test]
async fn cycle_counts_every_resource_type() {
    let connector = ZuperConnector::new(populated(Annotations::new()).await);

    let summary = run_sync_cycle(&connector, &SyncContext::new(), 1)
        .await
        .unwrap_or_else(|error| panic!("sync cycle failed: {error}"));

    let counts = |key: &str| summary.resource_types.get(key).cloned().unwrap_or_default();
    assert_eq!(
        counts("user"),
        ResourceTypeSummary {
            resources: 3,
            entitlements: 0,
            grants: 4,
            pages: 3,
            missing: 0,
        }
    );
    assert_eq!(
        counts("role"),
        ResourceTypeSummary {
            resources: 3,
            entitlements: 3,
            grants: 2,
            pages: 1,
            missing: 0,
        }
    );
    assert_eq!(
        counts("access-role"),
        ResourceTypeSummary {
            resources: 1,
            entitlements: 1,
            grants: 2,
            pages: 1,
            missing: 0,
        }
    );
    assert_eq!(
        counts("team"),
        ResourceTypeSummary {
            resources: 1,
            entitlements: 1,
            grants: 2,
            pages: 1,
            missing: 0,
        }
    );
    assert!(summary.rate_limit.is_none());
}

#[tokio::test]
async fn cycle_reports_latest_rate_limit() {
    let rate_limit = RateLimitDescription {
        status: RateLimitStatus::Overlimit,
        limit: Some(10),
        remaining: Some(0),
        reset_at: None,
    };
    let connector = ZuperConnector::new(populated(Annotations::from(rate_limit.clone())).await);

    let summary = run_sync_cycle(&connector, &SyncContext::new(), 50)
        .await
        .unwrap_or_else(|error| panic!("sync cycle failed: {error}"));

    assert_eq!(summary.rate_limit, Some(rate_limit));
}

#[tokio::test]
async fn cancelled_cycle_stops_before_listing() {
    let client = populated(Annotations::new()).await;
    let connector = ZuperConnector::new(client.clone());
    let ctx = SyncContext::new();
    ctx.cancel();

    let result = run_sync_cycle(&connector, &ctx, 50).await;

    assert!(matches!(result, Err(AppError::Cancelled(_))));
    assert_eq!(client.list_user_requests().await, 0);
}

#[tokio::test]
async fn user_gone_before_grants_is_counted_as_missing() {
    let client = populated(Annotations::new()).await;
    client.hide_user("c").await;
    let connector = ZuperConnector::new(client);

    let summary = run_sync_cycle(&connector, &SyncContext::new(), 50)
        .await
        .unwrap_or_else(|error| panic!("sync cycle failed: {error}"));

    let users = summary.resource_types.get("user").cloned().unwrap_or_default();
    assert_eq!(users.resources, 3);
    assert_eq!(users.grants, 3);
    assert_eq!(users.missing, 1);
    assert_eq!(
        summary.resource_types.get("team").map(|team| team.missing),
        Some(0)
    );
}

#[tokio::test]
async fn rate_limit_keeps_only_the_latest_page() {
    let earlier = RateLimitDescription {
        status: RateLimitStatus::Ok,
        limit: Some(10),
        remaining: Some(9),
        reset_at: None,
    };
    let latest = RateLimitDescription {
        remaining: Some(8),
        ..earlier.clone()
    };
    let mut annotations = Annotations::from(earlier);
    annotations.push(Annotation::RateLimit(latest.clone()));
    let connector = ZuperConnector::new(populated(annotations).await);

    let summary = run_sync_cycle(&connector, &SyncContext::new(), 50)
        .await
        .unwrap_or_else(|error| panic!("sync cycle failed: {error}"));

    assert_eq!(summary.rate_limit, Some(latest));
}
