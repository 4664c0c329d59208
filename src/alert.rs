//! Trigger an alert through the PagerDuty Events API v2.
use crate::datetool::Clock;
use crate::pagerduty::transport::{HttpReply, HttpRequest, Method, Transport};
use anyhow::Result;
use serde_json::{json, Value};

pub const EVENTS_URL: &str = "https://events.pagerduty.com/v2/enqueue";

/// Trigger event for the integration behind `routing_key`.
///
/// `dedup` groups repeated alerts into one incident; PagerDuty caps it at 255 characters.
pub fn build_alert(routing_key: &str, title: &str, alert_body: &str, dedup: &str) -> Value {
    json!({
        "routing_key": routing_key,
        "event_action": "trigger",
        "dedup_key": dedup,
        "payload": {
            "summary": title,
            "source": "custom_event",
            "severity": "critical",
            "custom_details": {
                "alert_body": alert_body,
            },
        },
    })
}

/// POST a trigger event. Without `dedup` the clock's epoch seconds are used.
pub fn send_alert(
    transport: &dyn Transport,
    clock: &dyn Clock,
    routing_key: &str,
    title: &str,
    alert_body: &str,
    dedup: Option<&str>,
) -> Result<HttpReply> {
    let dedup = match dedup {
        Some(dedup) => dedup.to_string(),
        None => clock.now().timestamp().to_string(),
    };
    let mut request = HttpRequest::new(Method::Post, EVENTS_URL);
    request.body = Some(build_alert(routing_key, title, alert_body, &dedup));

    let reply = transport.send(&request)?;
    tracing::info!(status = reply.status, dedup_key = %dedup, "alert status");
    tracing::info!(response = %reply.body, "alert response");
    if !reply.is_success() {
        tracing::error!(status = reply.status, "alert was not accepted");
    }
    Ok(reply)
}
