use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

/// An account as known to this service. `auth_id` is the hosted auth
/// platform's subject id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub auth_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}
