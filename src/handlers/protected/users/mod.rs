use serde::Serialize;
use utoipa::ToSchema;

use crate::database::models::user::UserProfile;

pub mod assign;
pub mod detail;
pub mod list;

pub use assign::assign_mentor;
pub use detail::{detail, update};
pub use list::list;

/// Serialized user as returned by the list and detail endpoints: the mentor
/// relation is flattened to the mentor's username plus the usernames of all
/// mentees.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserView {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub mentor: Option<String>,
    pub mentees: Vec<String>,
    /// Stored bcrypt digest. Present only when the caller requests their own
    /// record; see DESIGN.md for the rationale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl From<UserProfile> for UserView {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id,
            username: profile.username,
            email: profile.email,
            phone: profile.phone,
            mentor: profile.mentor,
            mentees: profile.mentees,
            password: None,
        }
    }
}

/// Human-readable confirmation payload
#[derive(Debug, Serialize, ToSchema)]
pub struct DetailMessage {
    pub detail: String,
}
