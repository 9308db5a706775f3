use std::time::Duration;

use clap::Parser;

use crate::monitor::MonitorConfig;
use crate::notifier::PushoverCredentials;

#[derive(Debug, Parser)]
#[command(
    name = "varaosabotti",
    version,
    about = "Monitor varaosahaku.fi for car parts availability."
)]
pub struct Cli {
    /// Varaosahaku.fi category page URL
    #[arg(long, env = "VARAOSABOTTI_URL")]
    pub url: Option<String>,

    /// Category name to monitor, optionally as `parent / name` or `group / parent / name`
    #[arg(long, env = "VARAOSABOTTI_CATEGORY")]
    pub category: Option<String>,

    /// Polling interval in seconds
    #[arg(
        long,
        env = "VARAOSABOTTI_INTERVAL",
        default_value_t = 300,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval: u64,

    /// Pushover application API token
    #[arg(long, env = "PUSHOVER_TOKEN", hide_env_values = true)]
    pub pushover_token: Option<String>,

    /// Pushover user key
    #[arg(long, env = "PUSHOVER_USER", hide_env_values = true)]
    pub pushover_user: Option<String>,

    /// Fetch the page, print all categories with their status, then exit
    #[arg(long)]
    pub list_categories: bool,

    /// Print the category list as JSON
    #[arg(long, requires = "list_categories")]
    pub json: bool,

    /// Send a test Pushover notification and exit
    #[arg(long)]
    pub test_notification: bool,

    /// Run a single check and exit
    #[arg(long)]
    pub once: bool,

    /// Enable debug logging
    #[arg(long)]
    pub verbose: bool,
}

impl Cli {
    pub fn pushover(&self) -> Option<PushoverCredentials> {
        PushoverCredentials::from_parts(self.pushover_token.clone(), self.pushover_user.clone())
    }

    pub fn monitor_config(&self, url: &str, query: &str) -> MonitorConfig {
        MonitorConfig {
            url: url.to_string(),
            query: query.to_string(),
            interval: Duration::from_secs(self.interval),
            once: self.once,
        }
    }
}
