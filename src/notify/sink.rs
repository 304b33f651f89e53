//! Outbound notification delivery boundary.
//!
//! The deduplicator hands every relevant notification to a
//! [`NotificationSink`] as fire-and-forget: a sink failure is logged by the
//! caller and never affects dedup state or later reconciliations. Retry
//! policy, if any, belongs behind the sink, not in front of it.

use crate::logging::{self, Component};
use crate::model::DeliveryError;

/// Abstract "send(contact, text)" capability.
///
/// `contact` is an opaque reference supplied by the observer record, e.g. a
/// phone number in E.164 form. Implementations must not block indefinitely;
/// transport timeouts are their responsibility.
pub trait NotificationSink {
    fn send(&self, contact: &str, text: &str) -> Result<(), DeliveryError>;
}

// ---------------------------------------------------------------------------
// Console sink
// ---------------------------------------------------------------------------

/// Development sink that prints the message instead of delivering it.
///
/// Stands in for a real SMS gateway when none is configured; the output
/// block makes simulated deliveries easy to spot in service logs.
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn send(&self, contact: &str, text: &str) -> Result<(), DeliveryError> {
        println!("   ========================================");
        println!("   SIMULATED SMS NOTIFICATION");
        println!("   ----------------------------------------");
        println!("   TO: {}", contact);
        println!("   MESSAGE: {}", text);
        println!("   ========================================");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SMS gateway sink
// ---------------------------------------------------------------------------

/// Environment variable holding the gateway auth token. Kept out of the
/// config file; loaded via dotenv at startup.
pub const GATEWAY_TOKEN_ENV: &str = "COASTMON_SMS_TOKEN";

/// Sink that posts messages to a Twilio-style HTTP SMS gateway.
pub struct SmsGatewaySink {
    client: reqwest::blocking::Client,
    gateway_url: String,
    from_number: String,
    auth_token: String,
}

#[derive(serde::Serialize)]
struct GatewayMessage<'a> {
    to: &'a str,
    from: &'a str,
    body: &'a str,
}

impl SmsGatewaySink {
    /// Builds the sink from gateway settings, reading the auth token from
    /// `COASTMON_SMS_TOKEN`.
    ///
    /// Fails with `DeliveryError::NotConfigured` if the token is absent, so
    /// a misconfigured deployment is caught at startup rather than on the
    /// first emergency.
    pub fn new(gateway_url: &str, from_number: &str) -> Result<Self, DeliveryError> {
        let auth_token = std::env::var(GATEWAY_TOKEN_ENV).map_err(|_| {
            DeliveryError::NotConfigured(format!("{} is not set", GATEWAY_TOKEN_ENV))
        })?;
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;
        Ok(SmsGatewaySink {
            client,
            gateway_url: gateway_url.to_string(),
            from_number: from_number.to_string(),
            auth_token,
        })
    }
}

impl NotificationSink for SmsGatewaySink {
    fn send(&self, contact: &str, text: &str) -> Result<(), DeliveryError> {
        let payload = GatewayMessage {
            to: contact,
            from: &self.from_number,
            body: text,
        };
        let response = self
            .client
            .post(&self.gateway_url)
            .bearer_auth(&self.auth_token)
            .json(&payload)
            .send()
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Http(status.as_u16()));
        }
        logging::debug(
            Component::Sms,
            Some(contact),
            &format!("gateway accepted message ({})", status.as_u16()),
        );
        Ok(())
    }
}
