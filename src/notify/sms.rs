//! SMS text formatting.
//!
//! Presentation layered on top of emitted notification events, never part of
//! the event data itself. A message reads:
//!
//!   `EMERGENCY: Cyclone Alert - Heavy rains expected. EVACUATE IMMEDIATELY.`
//!
//! The free-form alert message is shortened to keep the critical parts
//! (level, hazard type, call to action) intact, and the whole text is capped
//! at the single-segment SMS limit.

use crate::model::{Alert, Severity};

/// Single-segment SMS length limit.
pub const SMS_MAX_LEN: usize = 160;

/// Longest slice of the free-form alert message included in the SMS.
const MESSAGE_EXCERPT_LEN: usize = 50;

/// Severity-specific call-to-action appended to every SMS.
fn call_to_action(severity: Severity) -> &'static str {
    match severity {
        Severity::Emergency => "EVACUATE IMMEDIATELY.",
        Severity::Alert => "Take immediate action.",
        Severity::Warning => "Stay alert.",
    }
}

/// Formats the outbound SMS text for an alert.
pub fn format_alert_sms(alert: &Alert) -> String {
    let mut text = format!(
        "{}: {}",
        alert.severity.to_string().to_uppercase(),
        alert.kind
    );

    if let Some(message) = &alert.message {
        let message = message.trim();
        if !message.is_empty() {
            text.push_str(" - ");
            text.push_str(&excerpt(message, MESSAGE_EXCERPT_LEN));
        }
    }

    text.push(' ');
    text.push_str(call_to_action(alert.severity));

    if text.len() > SMS_MAX_LEN {
        text = format!("{}...", truncate_on_char_boundary(&text, SMS_MAX_LEN - 3));
    }
    text
}

/// Shortens `s` to at most `max` characters, appending "..." when cut.
fn excerpt(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}...", truncate_on_char_boundary(s, max))
    }
}

fn truncate_on_char_boundary(s: &str, mut at: usize) -> &str {
    while at > 0 && !s.is_char_boundary(at) {
        at -= 1;
    }
    &s[..at]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HazardRegion, Point};

    fn alert(severity: Severity, kind: &str, message: Option<&str>) -> Alert {
        Alert {
            id: "a1".to_string(),
            kind: kind.to_string(),
            severity,
            region: HazardRegion::circle(Point::new(21.0, 72.0), 5000.0)
                .expect("valid region"),
            created_at_ms: 1_700_000_000_000,
            message: message.map(String::from),
            author_id: None,
        }
    }

    #[test]
    fn test_emergency_sms_has_uppercase_level_and_evacuation_suffix() {
        let text = format_alert_sms(&alert(
            Severity::Emergency,
            "Cyclone Alert",
            Some("Heavy rains and strong winds expected."),
        ));
        assert_eq!(
            text,
            "EMERGENCY: Cyclone Alert - Heavy rains and strong winds expected. \
             EVACUATE IMMEDIATELY."
        );
    }

    #[test]
    fn test_warning_sms_uses_stay_alert_suffix() {
        let text = format_alert_sms(&alert(Severity::Warning, "High Surf Advisory", None));
        assert_eq!(text, "WARNING: High Surf Advisory Stay alert.");
    }

    #[test]
    fn test_alert_sms_uses_immediate_action_suffix() {
        let text = format_alert_sms(&alert(Severity::Alert, "Oil Spill", None));
        assert!(text.ends_with("Take immediate action."), "got '{}'", text);
    }

    #[test]
    fn test_long_free_form_message_is_excerpted_at_50_chars() {
        let long = "x".repeat(120);
        let text = format_alert_sms(&alert(Severity::Alert, "Algal Bloom", Some(&long)));
        assert!(
            text.contains(&format!("{}...", "x".repeat(50))),
            "message should be cut to 50 chars with ellipsis: '{}'",
            text
        );
        assert!(!text.contains(&"x".repeat(51)));
    }

    #[test]
    fn test_total_sms_length_never_exceeds_160() {
        let long_kind = "Extremely Detailed And Verbose Hazard Classification Label ".repeat(3);
        let text = format_alert_sms(&alert(
            Severity::Emergency,
            long_kind.trim(),
            Some("some additional detail for the message body"),
        ));
        assert!(
            text.len() <= SMS_MAX_LEN,
            "SMS must fit one segment, got {} chars",
            text.len()
        );
        assert!(text.ends_with("..."), "overlong SMS should end with ellipsis");
    }

    #[test]
    fn test_empty_message_is_omitted_entirely() {
        let text = format_alert_sms(&alert(Severity::Warning, "Illegal Dumping", Some("   ")));
        assert_eq!(text, "WARNING: Illegal Dumping Stay alert.");
    }
}
