//! Outbound SMS notification via Twilio's REST API.
//!
//! One operation: send a message body to a destination number. Runs only
//! after a section has been resolved, and only when the caller supplied a
//! destination; delivery failures are reported to the caller, never
//! retried here.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notifier is not configured: {message}")]
    Config { message: String },

    #[error("sms delivery failed: {message}")]
    Delivery { message: String },

    #[error("unexpected response from the sms gateway: {message}")]
    Malformed { message: String },
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        NotifyError::Delivery {
            message: err.to_string(),
        }
    }
}

/// Twilio credentials and sender number.
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
}

impl NotifyConfig {
    /// Reads `TWILIO_ACCOUNT_SID`, `TWILIO_AUTH_TOKEN`, and
    /// `TWILIO_PHONE_NUM` from the environment. All three must be present
    /// and non-empty.
    pub fn from_env() -> Result<Self, NotifyError> {
        Ok(Self {
            account_sid: require_env("TWILIO_ACCOUNT_SID")?,
            auth_token: require_env("TWILIO_AUTH_TOKEN")?,
            from_number: require_env("TWILIO_PHONE_NUM")?,
        })
    }
}

fn require_env(name: &str) -> Result<String, NotifyError> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or_else(|| NotifyError::Config {
            message: format!("{name} is not set"),
        })
}

fn messages_url(base: &str, account_sid: &str) -> String {
    format!("{base}/Accounts/{account_sid}/Messages.json")
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    sid: String,
}

/// SMS dispatcher holding one HTTP client for the process lifetime.
pub struct SmsNotifier {
    http: Client,
    config: NotifyConfig,
}

impl SmsNotifier {
    pub fn new(config: NotifyConfig) -> Result<Self, NotifyError> {
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("seatwatch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }

    /// Sends one SMS and returns the gateway's message sid.
    pub async fn send(&self, to: &str, body: &str) -> Result<String, NotifyError> {
        let url = messages_url(TWILIO_API_BASE, &self.config.account_sid);
        debug!(to = %to, "sending sms");

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[
                ("To", to),
                ("From", self.config.from_number.as_str()),
                ("Body", body),
            ])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(NotifyError::Delivery {
                message: format!("gateway returned {status}: {text}"),
            });
        }

        let message: MessageResponse =
            serde_json::from_str(&text).map_err(|err| NotifyError::Malformed {
                message: err.to_string(),
            })?;
        info!(sid = %message.sid, "sms accepted by gateway");
        Ok(message.sid)
    }
}
