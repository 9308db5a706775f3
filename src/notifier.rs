use log::{error, info, warn};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::models::Category;

pub const PUSHOVER_API_URL: &str = "https://api.pushover.net/1/messages.json";

/// Receives one call per category that just became available.
pub trait Alert {
    fn alert(&self, category: &Category, url: &str);
}

#[derive(Debug, Clone)]
pub struct PushoverCredentials {
    pub token: String,
    pub user: String,
}

impl PushoverCredentials {
    /// Both halves are needed; a lone token or user key disables push.
    pub fn from_parts(token: Option<String>, user: Option<String>) -> Option<Self> {
        match (token, user) {
            (Some(token), Some(user)) if !token.is_empty() && !user.is_empty() => {
                Some(Self { token, user })
            }
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
struct PushoverMessage<'a> {
    token: &'a str,
    user: &'a str,
    title: String,
    message: String,
    url: &'a str,
    url_title: &'a str,
    priority: i8,
    sound: &'a str,
}

impl<'a> PushoverMessage<'a> {
    fn new(category: &Category, url: &'a str, credentials: &'a PushoverCredentials) -> Self {
        let label = category.label();
        Self {
            token: &credentials.token,
            user: &credentials.user,
            title: format!("Varaosabotti: {}", label),
            message: format!("Parts are now available for '{}'!", label),
            url,
            url_title: "View on varaosahaku.fi",
            priority: 1,
            sound: "bugle",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PushoverResponse {
    #[serde(default)]
    errors: Vec<String>,
}

pub struct Notifier {
    client: Client,
    pushover: Option<PushoverCredentials>,
}

impl Notifier {
    pub fn new(client: Client, pushover: Option<PushoverCredentials>) -> Self {
        Self { client, pushover }
    }

    pub fn pushover_enabled(&self) -> bool {
        self.pushover.is_some()
    }

    /// Posts one push message. Failures are logged, never returned.
    pub fn send_pushover(&self, category: &Category, url: &str, credentials: &PushoverCredentials) {
        let label = category.label();
        let payload = PushoverMessage::new(category, url, credentials);

        let resp = match self.client.post(PUSHOVER_API_URL).form(&payload).send() {
            Ok(resp) => resp,
            Err(e) => {
                error!("Failed to send Pushover notification (network error): {}", e);
                return;
            }
        };

        let status = resp.status();
        if status.is_success() {
            info!("Pushover notification sent for '{}'.", label);
            return;
        }

        let body = resp.json::<PushoverResponse>().unwrap_or_default();
        error!("Pushover error: {}", error_detail(status, &body.errors));
    }
}

impl Alert for Notifier {
    fn alert(&self, category: &Category, url: &str) {
        log_alert(category, url);
        if let Some(credentials) = &self.pushover {
            self.send_pushover(category, url, credentials);
        }
    }
}

pub fn log_alert(category: &Category, url: &str) {
    warn!(
        "ALERT: '{}' is now ACTIVE - parts are available! URL: {}",
        category.label(),
        url
    );
}

fn error_detail(status: StatusCode, errors: &[String]) -> String {
    if errors.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        errors.join("; ")
    }
}
