use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Open incident as listed by `GET /incidents`; also the close-incidents CSV row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    pub incident_id: String,
    pub incident_number: u64,
    pub title: String,
    pub created_at: String,
    pub status: String,
    pub last_status_change_at: String,
    pub has_priority: bool,
    pub urgency: String,
}

#[derive(Deserialize)]
struct IncidentResponse {
    id: String,
    incident_number: u64,
    title: String,
    created_at: String,
    status: String,
    last_status_change_at: String,
    #[serde(default)]
    priority: Option<Value>,
    urgency: String,
}

impl Incident {
    pub fn build_from(resp: Value) -> serde_json::Result<Self> {
        let resp: IncidentResponse = serde_json::from_value(resp)?;
        Ok(Self {
            incident_id: resp.id,
            incident_number: resp.incident_number,
            title: resp.title,
            created_at: resp.created_at,
            status: resp.status,
            last_status_change_at: resp.last_status_change_at,
            has_priority: resp.priority.is_some_and(|priority| !priority.is_null()),
            urgency: resp.urgency,
        })
    }
}
