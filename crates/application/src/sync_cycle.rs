//! Full List, Entitlements and Grants walk over every resource type.

use std::collections::{BTreeMap, HashSet};
use std::future::Future;

use serde::Serialize;
use tracing::{info, warn};
use zuper_core::{AppError, AppResult};
use zuper_domain::{PageToken, RateLimitDescription, RateLimitStatus};

use crate::{Page, SyncContext, ZuperConnector};

/// Counts collected for one resource type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResourceTypeSummary {
    /// Resources listed.
    pub resources: usize,
    /// Entitlements listed.
    pub entitlements: usize,
    /// Grants listed.
    pub grants: usize,
    /// Upstream pages requested by List.
    pub pages: usize,
    /// Resources that disappeared upstream before their grants were read.
    pub missing: usize,
}

/// Outcome of one sync cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    /// Counts per resource type id.
    pub resource_types: BTreeMap<String, ResourceTypeSummary>,
    /// Most recent rate-limit state reported by the API, if any.
    pub rate_limit: Option<RateLimitDescription>,
}

/// Runs one complete sync cycle through the connector.
pub async fn run_sync_cycle(
    connector: &ZuperConnector,
    ctx: &SyncContext,
    page_size: u32,
) -> AppResult<SyncSummary> {
    let mut summary = SyncSummary::default();

    for syncer in connector.syncers() {
        let syncer = syncer.as_ref();
        let resource_type = syncer.resource_type();
        let mut counts = ResourceTypeSummary::default();

        let (resources, pages) =
            collect_pages(ctx, page_size, &mut summary.rate_limit, move |token| async move {
                syncer.list(ctx, None, &token).await
            })
            .await?;
        counts.resources = resources.len();
        counts.pages = pages;

        for resource in &resources {
            let (entitlements, _) =
                collect_pages(ctx, page_size, &mut summary.rate_limit, move |token| async move {
                    syncer.entitlements(ctx, resource, &token).await
                })
                .await?;
            counts.entitlements += entitlements.len();

            let grants =
                collect_pages(ctx, page_size, &mut summary.rate_limit, move |token| async move {
                    syncer.grants(ctx, resource, &token).await
                })
                .await;
            match grants {
                Ok((grants, _)) => counts.grants += grants.len(),
                Err(error) if error.is_not_found() => {
                    warn!(
                        resource_type = %resource_type.id,
                        resource = %resource.id.resource,
                        error = %error,
                        "resource disappeared before its grants were read"
                    );
                    counts.missing += 1;
                }
                Err(error) => return Err(error),
            }
        }

        info!(
            resource_type = %resource_type.id,
            resources = counts.resources,
            entitlements = counts.entitlements,
            grants = counts.grants,
            missing = counts.missing,
            "resource type synced"
        );
        summary
            .resource_types
            .insert(resource_type.id.to_string(), counts);
    }

    if let Some(rate_limit) = &summary.rate_limit
        && rate_limit.status == RateLimitStatus::Overlimit
    {
        warn!(reset_at = ?rate_limit.reset_at, "zuper rate limit exhausted");
    }

    Ok(summary)
}

/// Follows continuation tokens until an empty one, failing on a repeated token.
/// Returns the items and the number of pages fetched; `rate_limit` keeps the
/// latest rate-limit state seen.
async fn collect_pages<T, F, Fut>(
    ctx: &SyncContext,
    page_size: u32,
    rate_limit: &mut Option<RateLimitDescription>,
    mut fetch: F,
) -> AppResult<(Vec<T>, usize)>
where
    F: FnMut(PageToken) -> Fut,
    Fut: Future<Output = AppResult<Page<T>>>,
{
    let mut items = Vec::new();
    let mut seen_tokens = HashSet::new();
    let mut token = PageToken::new(String::new(), page_size);
    let mut pages = 0;

    loop {
        ctx.ensure_active("sync cycle")?;
        let page = fetch(token.clone()).await?;
        pages += 1;
        items.extend(page.items);
        if let Some(latest) = page.annotations.rate_limit() {
            *rate_limit = Some(latest.clone());
        }

        if page.next_token.is_empty() {
            return Ok((items, pages));
        }
        if !seen_tokens.insert(page.next_token.clone()) {
            return Err(AppError::InvalidPageToken(format!(
                "listing did not advance past token '{}'",
                page.next_token
            )));
        }
        token.token = page.next_token;
    }
}

#[cfg(test)]
mod tests;
