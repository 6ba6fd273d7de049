//! Time-bounded view of the access roles seen on users.
//!
//! The API has no access-role listing, so the set is rebuilt by walking every
//! user page. Readers see either the previous snapshot or the fully merged new
//! one; entries are only ever added.

use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, info};
use zuper_core::{AppError, AppResult};
use zuper_domain::{AccessRole, Annotations, PageOptions, User};

use crate::{SyncContext, UserDirectory};

/// Default freshness window of the cache.
pub const DEFAULT_ACCESS_ROLE_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Default)]
struct CacheState {
    entries: BTreeMap<String, AccessRole>,
    last_refresh: Option<Instant>,
}

/// Access roles keyed by uid, refreshed from a full user walk.
#[derive(Debug)]
pub struct AccessRoleCache {
    state: RwLock<CacheState>,
    refresh: Mutex<()>,
    ttl: Duration,
}

impl Default for AccessRoleCache {
    fn default() -> Self {
        Self::new(DEFAULT_ACCESS_ROLE_TTL)
    }
}

impl AccessRoleCache {
    /// Creates an empty cache with the given freshness window.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            state: RwLock::new(CacheState::default()),
            refresh: Mutex::new(()),
            ttl,
        }
    }

    /// Merges access roles carried by `users` without marking the cache fresh.
    pub async fn observe(&self, users: &[User]) {
        let discovered = collect_access_roles(users);
        if discovered.is_empty() {
            return;
        }

        self.state.write().await.entries.extend(discovered);
    }

    /// Returns every cached access role ordered by uid.
    pub async fn snapshot(&self) -> Vec<AccessRole> {
        self.state.read().await.entries.values().cloned().collect()
    }

    /// Rebuilds the cache from a full user walk unless it is fresh.
    ///
    /// At most one refresh runs at a time; callers that waited on a running
    /// refresh reuse its result.
    pub async fn ensure_fresh<C>(
        &self,
        ctx: &SyncContext,
        client: &C,
        page_size: u32,
    ) -> AppResult<Annotations>
    where
        C: UserDirectory + ?Sized,
    {
        if self.is_fresh().await {
            return Ok(Annotations::new());
        }

        let _refresh = ctx
            .run("access role refresh", async { Ok(self.refresh.lock().await) })
            .await?;
        if self.is_fresh().await {
            return Ok(Annotations::new());
        }

        let mut annotations = Annotations::new();
        let mut discovered = BTreeMap::new();
        let mut seen_tokens = HashSet::new();
        let mut options = PageOptions::new(String::new(), page_size);
        let mut pages = 0_u32;

        loop {
            ctx.ensure_active("access role refresh")?;
            let page = client.list_users(ctx, &options).await?;
            pages += 1;
            annotations.merge(page.annotations);
            discovered.extend(collect_access_roles(&page.items));
            debug!(page = pages, users = page.items.len(), "scanned users page for access roles");

            if page.next_token.is_empty() {
                break;
            }
            if !seen_tokens.insert(page.next_token.clone()) {
                return Err(AppError::InvalidPageToken(format!(
                    "users listing did not advance past token '{}'",
                    page.next_token
                )));
            }
            options.page_token = page.next_token;
        }

        let mut state = self.state.write().await;
        state.entries.extend(discovered);
        state.last_refresh = Some(Instant::now());
        info!(
            access_roles = state.entries.len(),
            pages,
            "access role cache refreshed"
        );

        Ok(annotations)
    }

    async fn is_fresh(&self) -> bool {
        let state = self.state.read().await;
        !state.entries.is_empty()
            && state
                .last_refresh
                .is_some_and(|refreshed| refreshed.elapsed() < self.ttl)
    }
}

fn collect_access_roles(users: &[User]) -> BTreeMap<String, AccessRole> {
    users
        .iter()
        .filter_map(User::assigned_access_role)
        .map(|access_role| (access_role.access_role_uid.clone(), access_role.clone()))
        .collect()
}
