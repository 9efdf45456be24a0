use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Gamification counters touched when reminders go out.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserStanding {
    pub user_id: String,
    pub experience: i64,
    pub trust_level: i64,
}
