use serde::{Deserialize, Serialize};
use zuper_domain::{NewUser, TeamMembership, User};

/// Paginated collection envelope.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(super) struct ListEnvelope<T> {
    #[serde(default)]
    pub(super) data: Vec<T>,
    #[serde(default)]
    pub(super) total_pages: u32,
    #[serde(default)]
    pub(super) current_page: u32,
}

/// Single record envelope.
#[derive(Debug, Deserialize)]
pub(super) struct DetailEnvelope<T> {
    pub(super) data: T,
}

/// `{type, title, message}` envelope used by mutations and error responses.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct MessageEnvelope {
    #[serde(rename = "type")]
    pub(super) kind: String,
    pub(super) title: String,
    pub(super) message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct CreatedUserData {
    pub(super) user_uid: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct CreateUserEnvelope {
    #[serde(default)]
    pub(super) message: String,
    #[serde(default)]
    pub(super) data: CreatedUserData,
}

#[derive(Debug, Serialize)]
pub(super) struct WorkHour {
    day: &'static str,
    start_time: &'static str,
    end_time: &'static str,
    work_mins: u32,
    track_location: bool,
    is_enabled: &'static str,
}

const WEEK: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Work-hours block attached to every created user.
pub(super) fn default_work_hours() -> Vec<WorkHour> {
    WEEK.iter()
        .map(|day| WorkHour {
            day: *day,
            start_time: "06:00 AM",
            end_time: "06:00 PM",
            work_mins: 0,
            track_location: true,
            is_enabled: "false",
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub(super) struct CreateUserRequest<'a> {
    pub(super) work_hours: Vec<WorkHour>,
    pub(super) user: &'a NewUser,
}

#[derive(Debug, Serialize)]
pub(super) struct RoleUpdate {
    pub(super) role_id: u8,
}

#[derive(Debug, Serialize)]
pub(super) struct AccessRoleUpdate<'a> {
    pub(super) access_role_uid: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct UserUpdateRequest<T> {
    pub(super) user: T,
}

#[derive(Debug, Serialize)]
pub(super) struct TeamAssignmentRequest<'a> {
    pub(super) team_uid: &'a str,
    pub(super) user_uid: &'a str,
}

pub(super) type UserDetailEnvelope = DetailEnvelope<User>;
pub(super) type TeamDetailEnvelope = DetailEnvelope<TeamMembership>;
