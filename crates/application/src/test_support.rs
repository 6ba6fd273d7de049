//! In-memory Zuper API used by the application tests.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::Mutex;
use zuper_core::{AppError, AppResult};
use zuper_domain::pagination::next_token;
use zuper_domain::{
    AccessRole, Annotations, CreatedUser, MutationReceipt, NewUser, PageOptions, Role, Team,
    TeamMembership, User, UserRoleRef,
};

use crate::{
    AccessRoleAssignmentClient, AccountClient, Annotated, Paged, RoleAssignmentClient,
    SyncContext, TeamClient, UserDirectory,
};

/// Mutation recorded by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    CreateUser(NewUser),
    UpdateRole { user_uid: String, role_id: u8 },
    UpdateAccessRole { user_uid: String, access_role_uid: String },
    Assign { team_uid: String, user_uid: String },
    Unassign { team_uid: String, user_uid: String },
}

#[derive(Default)]
struct FakeState {
    users: Vec<User>,
    teams: Vec<TeamMembership>,
    calls: Vec<Call>,
    list_user_requests: usize,
    pinned_user_token: Option<String>,
    hidden_users: HashSet<String>,
}

#[derive(Default)]
pub(crate) struct FakeZuperApi {
    state: Mutex<FakeState>,
    annotations: Annotations,
}

impl FakeZuperApi {
    pub(crate) fn with_users(users: Vec<User>) -> Self {
        Self {
            state: Mutex::new(FakeState {
                users,
                ..FakeState::default()
            }),
            annotations: Annotations::new(),
        }
    }

    pub(crate) fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }

    pub(crate) async fn add_team(&self, team_uid: &str, team_name: &str, member_uids: &[&str]) {
        let mut state = self.state.lock().await;
        let members = member_uids
            .iter()
            .map(|uid| {
                state
                    .users
                    .iter()
                    .find(|user| user.user_uid == *uid)
                    .cloned()
                    .unwrap_or_else(|| user(uid, None, None))
            })
            .collect();
        state.teams.push(TeamMembership {
            team: Team {
                team_uid: team_uid.to_owned(),
                team_name: team_name.to_owned(),
                user_count: i64::try_from(member_uids.len()).unwrap_or_default(),
                is_active: true,
                ..Team::default()
            },
            members,
        });
    }

    /// Makes every users page answer with the same continuation token.
    pub(crate) async fn pin_user_token(&self, token: &str) {
        self.state.lock().await.pinned_user_token = Some(token.to_owned());
    }

    /// Keeps a user in listings but answers its detail lookup with not found.
    pub(crate) async fn hide_user(&self, user_uid: &str) {
        self.state.lock().await.hidden_users.insert(user_uid.to_owned());
    }

    pub(crate) async fn calls(&self) -> Vec<Call> {
        self.state.lock().await.calls.clone()
    }

    pub(crate) async fn list_user_requests(&self) -> usize {
        self.state.lock().await.list_user_requests
    }

    pub(crate) async fn user(&self, user_uid: &str) -> Option<User> {
        self.state
            .lock()
            .await
            .users
            .iter()
            .find(|user| user.user_uid == user_uid)
            .cloned()
    }

    fn receipt(&self, message: &str) -> Annotated<MutationReceipt> {
        Annotated::new(
            MutationReceipt {
                kind: "success".to_owned(),
                title: "Success".to_owned(),
                message: message.to_owned(),
            },
            self.annotations.clone(),
        )
    }
}

pub(crate) fn user(user_uid: &str, role: Option<Role>, access_role: Option<(&str, &str)>) -> User {
    User {
        user_uid: user_uid.to_owned(),
        first_name: format!("First-{user_uid}"),
        last_name: format!("Last-{user_uid}"),
        email: format!("{user_uid}@example.com"),
        designation: "Field Executive".to_owned(),
        emp_code: format!("E-{user_uid}"),
        is_active: true,
        role: role.map(role_ref),
        access_role: access_role.map(|(uid, name)| AccessRole {
            access_role_uid: uid.to_owned(),
            name: name.to_owned(),
            description: format!("{name} description"),
        }),
        ..User::default()
    }
}

fn role_ref(role: Role) -> UserRoleRef {
    let definition = role.definition();
    UserRoleRef {
        role_uid: definition.id.to_string(),
        role_name: definition.display_name.to_owned(),
        role_key: definition.key.to_owned(),
    }
}

fn role_by_id(role_id: &str) -> Option<Role> {
    Role::definitions()
        .iter()
        .find(|definition| definition.id.to_string() == role_id)
        .map(|definition| definition.role)
}

fn paginate<T: Clone>(items: &[T], options: &PageOptions) -> AppResult<(Vec<T>, String)> {
    let page = options.page()?;
    let size = options.effective_page_size() as usize;
    let total_pages = u32::try_from(items.len().div_ceil(size)).unwrap_or(u32::MAX);
    let start = (page as usize - 1).saturating_mul(size);
    let slice = items.iter().skip(start).take(size).cloned().collect();

    Ok((slice, next_token(page, total_pages)))
}

#[async_trait]
impl UserDirectory for FakeZuperApi {
    async fn list_users(
        &self,
        ctx: &SyncContext,
        options: &PageOptions,
    ) -> AppResult<Paged<User>> {
        ctx.ensure_active("list users")?;
        tokio::task::yield_now().await;
        let mut state = self.state.lock().await;
        state.list_user_requests += 1;
        let (items, next) = paginate(&state.users, options)?;
        let next = state.pinned_user_token.clone().unwrap_or(next);

        Ok(Paged::new(items, next, self.annotations.clone()))
    }

    async fn get_user(&self, ctx: &SyncContext, user_uid: &str) -> AppResult<Annotated<User>> {
        ctx.ensure_active("get user")?;
        let hidden = self.state.lock().await.hidden_users.contains(user_uid);
        let user = if hidden { None } else { self.user(user_uid).await };
        user.map(|user| Annotated::new(user, self.annotations.clone()))
            .ok_or_else(|| AppError::NotFound(format!("user '{user_uid}' does not exist")))
    }
}

#[async_trait]
impl AccountClient for FakeZuperApi {
    async fn create_user(
        &self,
        ctx: &SyncContext,
        new_user: &NewUser,
    ) -> AppResult<Annotated<CreatedUser>> {
        ctx.ensure_active("create user")?;
        let mut state = self.state.lock().await;
        let user_uid = format!("created-{}", state.users.len() + 1);
        state.calls.push(Call::CreateUser(new_user.clone()));
        state.users.push(User {
            user_uid: user_uid.clone(),
            first_name: new_user.first_name.clone(),
            last_name: new_user.last_name.clone(),
            email: new_user.email.clone(),
            designation: new_user.designation.clone(),
            emp_code: new_user.emp_code.clone(),
            is_active: true,
            role: role_by_id(&new_user.role_id).map(role_ref),
            ..User::default()
        });

        Ok(Annotated::new(
            CreatedUser {
                user_uid,
                message: "User created successfully".to_owned(),
            },
            self.annotations.clone(),
        ))
    }
}

#[async_trait]
impl RoleAssignmentClient for FakeZuperApi {
    async fn update_user_role(
        &self,
        ctx: &SyncContext,
        user_uid: &str,
        role_id: u8,
    ) -> AppResult<Annotated<MutationReceipt>> {
        ctx.ensure_active("update user role")?;
        let mut state = self.state.lock().await;
        state.calls.push(Call::UpdateRole {
            user_uid: user_uid.to_owned(),
            role_id,
        });
        if let Some(user) = state.users.iter_mut().find(|user| user.user_uid == user_uid) {
            user.role = role_by_id(&role_id.to_string()).map(role_ref);
        }

        Ok(self.receipt("User role updated"))
    }
}

#[async_trait]
impl AccessRoleAssignmentClient for FakeZuperApi {
    async fn update_user_access_role(
        &self,
        ctx: &SyncContext,
        user_uid: &str,
        access_role_uid: &str,
    ) -> AppResult<Annotated<MutationReceipt>> {
        ctx.ensure_active("update user access role")?;
        let mut state = self.state.lock().await;
        state.calls.push(Call::UpdateAccessRole {
            user_uid: user_uid.to_owned(),
            access_role_uid: access_role_uid.to_owned(),
        });
        if let Some(user) = state.users.iter_mut().find(|user| user.user_uid == user_uid) {
            user.access_role = Some(AccessRole {
                access_role_uid: access_role_uid.to_owned(),
                ..AccessRole::default()
            });
        }

        Ok(self.receipt("User access role updated"))
    }
}

#[async_trait]
impl TeamClient for FakeZuperApi {
    async fn list_teams(
        &self,
        ctx: &SyncContext,
        options: &PageOptions,
    ) -> AppResult<Paged<Team>> {
        ctx.ensure_active("list teams")?;
        let state = self.state.lock().await;
        let teams: Vec<Team> = state
            .teams
            .iter()
            .map(|membership| membership.team.clone())
            .collect();
        let (items, next) = paginate(&teams, options)?;

        Ok(Paged::new(items, next, self.annotations.clone()))
    }

    async fn get_team(
        &self,
        ctx: &SyncContext,
        team_uid: &str,
    ) -> AppResult<Annotated<TeamMembership>> {
        ctx.ensure_active("get team")?;
        self.state
            .lock()
            .await
            .teams
            .iter()
            .find(|membership| membership.team.team_uid == team_uid)
            .cloned()
            .map(|membership| Annotated::new(membership, self.annotations.clone()))
            .ok_or_else(|| AppError::NotFound(format!("team '{team_uid}' does not exist")))
    }

    async fn assign_user_to_team(
        &self,
        ctx: &SyncContext,
        team_uid: &str,
        user_uid: &str,
    ) -> AppResult<Annotated<MutationReceipt>> {
        ctx.ensure_active("assign team")?;
        let mut state = self.state.lock().await;
        state.calls.push(Call::Assign {
            team_uid: team_uid.to_owned(),
            user_uid: user_uid.to_owned(),
        });
        let member = state
            .users
            .iter()
            .find(|user| user.user_uid == user_uid)
            .cloned()
            .unwrap_or_else(|| user(user_uid, None, None));
        if let Some(membership) = state
            .teams
            .iter_mut()
            .find(|membership| membership.team.team_uid == team_uid)
        {
            membership.members.push(member);
        }

        Ok(self.receipt("User assigned to team"))
    }

    async fn unassign_user_from_team(
        &self,
        ctx: &SyncContext,
        team_uid: &str,
        user_uid: &str,
    ) -> AppResult<Annotated<MutationReceipt>> {
        ctx.ensure_active("unassign team")?;
        let mut state = self.state.lock().await;
        state.calls.push(Call::Unassign {
            team_uid: team_uid.to_owned(),
            user_uid: user_uid.to_owned(),
        });
        if let Some(membership) = state
            .teams
            .iter_mut()
            .find(|membership| membership.team.team_uid == team_uid)
        {
            membership.members.retain(|member| member.user_uid != user_uid);
        }

        Ok(self.receipt("User removed from team"))
    }
}
