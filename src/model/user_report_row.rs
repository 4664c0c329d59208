use crate::ioutil::join_list;
use serde::{Deserialize, Serialize};

/// Team reference attached to a user (`summary` is the team name).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub struct TeamRef {
    pub id: String,
    pub summary: String,
}

#[derive(Deserialize)]
struct UserResponse {
    id: String,
    name: String,
    html_url: String,
    email: String,
    #[serde(default)]
    job_title: Option<String>,
    role: String,
    time_zone: String,
    #[serde(default)]
    teams: Option<Vec<TeamRef>>,
    #[serde(default)]
    contact_methods: Option<Vec<ContactMethod>>,
    #[serde(default)]
    notification_rules: Option<Vec<NotificationRule>>,
}

#[derive(Deserialize)]
struct ContactMethod {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    blacklisted: bool,
}

#[derive(Deserialize)]
struct NotificationRule {
    start_delay_in_minutes: i64,
    urgency: String,
    contact_method: ContactMethodRef,
}

#[derive(Deserialize)]
struct ContactMethodRef {
    #[serde(rename = "type")]
    kind: String,
}

/// One user account in the user report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserReportRow {
    pub id: String,
    pub name: String,
    pub html_url: String,
    pub email: String,
    pub title: String,
    pub base_role: String,
    pub timezone: String,
    #[serde(serialize_with = "join_list")]
    pub observer_in: Vec<String>,
    #[serde(serialize_with = "join_list")]
    pub responder_in: Vec<String>,
    #[serde(serialize_with = "join_list")]
    pub manager_in: Vec<String>,
    pub on_schedule: bool,
    pub has_email: bool,
    pub has_push: bool,
    pub has_sms: bool,
    pub has_phone: bool,
    pub has_blocked: bool,
    #[serde(serialize_with = "join_list")]
    pub high_urgency_email_delay: Vec<String>,
    #[serde(serialize_with = "join_list")]
    pub high_urgency_push_delay: Vec<String>,
    #[serde(serialize_with = "join_list")]
    pub high_urgency_sms_delay: Vec<String>,
    #[serde(serialize_with = "join_list")]
    pub high_urgency_phone_delay: Vec<String>,
    #[serde(serialize_with = "join_list")]
    pub low_urgency_email_delay: Vec<String>,
    #[serde(serialize_with = "join_list")]
    pub low_urgency_push_delay: Vec<String>,
    #[serde(serialize_with = "join_list")]
    pub low_urgency_sms_delay: Vec<String>,
    #[serde(serialize_with = "join_list")]
    pub low_urgency_phone_delay: Vec<String>,
}

impl UserReportRow {
    /// Build from a `GET /users` entry pulled with contact methods and
    /// notification rules included. Team roles are filled in later from
    /// membership listings. Also returns the user's team references.
    pub fn build_from(resp: serde_json::Value) -> serde_json::Result<(Self, Vec<TeamRef>)> {
        let resp: UserResponse = serde_json::from_value(resp)?;
        let methods = resp.contact_methods.unwrap_or_default();
        let has_method = |kind: &str| methods.iter().any(|method| method.kind == kind);
        let rules = resp.notification_rules.unwrap_or_default();
        let delay = |kind: &str, urgency: &str| get_delay(&rules, kind, urgency);

        let row = Self {
            id: resp.id,
            name: resp.name,
            html_url: resp.html_url,
            email: resp.email,
            title: resp.job_title.unwrap_or_default(),
            base_role: resp.role,
            timezone: resp.time_zone,
            has_email: has_method("email_contact_method"),
            has_push: has_method("push_notification_contact_method"),
            has_sms: has_method("sms_contact_method"),
            has_phone: has_method("phone_contact_method"),
            has_blocked: methods.iter().any(|method| method.blacklisted),
            high_urgency_email_delay: delay("email", "high"),
            high_urgency_push_delay: delay("push", "high"),
            high_urgency_sms_delay: delay("sms", "high"),
            high_urgency_phone_delay: delay("phone", "high"),
            low_urgency_email_delay: delay("email", "low"),
            low_urgency_push_delay: delay("push", "low"),
            low_urgency_sms_delay: delay("sms", "low"),
            low_urgency_phone_delay: delay("phone", "low"),
            ..Self::default()
        };
        Ok((row, resp.teams.unwrap_or_default()))
    }

    /// The `<role>_in` column for a team role, if the role is one we report.
    pub fn teams_for_role(&mut self, role: &str) -> Option<&mut Vec<String>> {
        match role {
            "observer" => Some(&mut self.observer_in),
            "responder" => Some(&mut self.responder_in),
            "manager" => Some(&mut self.manager_in),
            _ => None,
        }
    }
}

/// Delays, in minutes, of notification rules whose contact type mentions `kind`.
fn get_delay(rules: &[NotificationRule], kind: &str, urgency: &str) -> Vec<String> {
    rules
        .iter()
        .filter(|rule| rule.contact_method.kind.contains(kind) && rule.urgency == urgency)
        .map(|rule| rule.start_delay_in_minutes.to_string())
        .collect()
}
