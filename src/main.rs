use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap::error::ErrorKind;
use log::{error, info};

use varaosabotti::config::Cli;
use varaosabotti::error::MonitorError;
use varaosabotti::fetcher::{self, FetchPage, HttpFetcher};
use varaosabotti::models::{Category, CategoryStatus};
use varaosabotti::monitor::Monitor;
use varaosabotti::notifier::Notifier;
use varaosabotti::{logging, parser, report};

const SITE_URL: &str = "https://www.varaosahaku.fi";

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.verbose).context("Failed to initialize logging")?;

    let client = fetcher::build_client().context("Failed to build HTTP client")?;

    if cli.test_notification {
        let Some(credentials) = cli.pushover() else {
            usage_error("--pushover-token and --pushover-user are required for --test-notification");
        };
        let notifier = Notifier::new(client, None);
        notifier.send_pushover(&test_category(), SITE_URL, &credentials);
        return Ok(ExitCode::SUCCESS);
    }

    let Some(url) = cli.url.as_deref() else {
        usage_error("--url is required (or set VARAOSABOTTI_URL)");
    };

    if cli.list_categories {
        let html = HttpFetcher::new(client).fetch(url)?;
        let categories = parser::extract(&html);
        if cli.json {
            println!("{}", report::render_json(&categories)?);
        } else {
            print!("{}", report::render_listing(&categories));
        }
        return Ok(ExitCode::SUCCESS);
    }

    let Some(query) = cli.category.as_deref() else {
        usage_error("--category is required (or set VARAOSABOTTI_CATEGORY)");
    };

    let notifier = Notifier::new(client.clone(), cli.pushover());
    if notifier.pushover_enabled() {
        info!("Pushover notifications enabled.");
    }

    let monitor = Monitor::new(HttpFetcher::new(client), notifier, cli.monitor_config(url, query));
    match monitor.run() {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(MonitorError::CategoryNotFound { query, suggestions }) => {
            error!("Category '{}' not found on page.", query);
            if !suggestions.is_empty() {
                error!("Did you mean one of these?");
                for s in &suggestions {
                    error!("  - {}", s);
                }
            }
            error!("Use --list-categories to see all available names.");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn usage_error(msg: &str) -> ! {
    Cli::command().error(ErrorKind::MissingRequiredArgument, msg).exit()
}

fn test_category() -> Category {
    Category {
        name: "Test".to_string(),
        title: "Test Notification".to_string(),
        href: String::new(),
        status: CategoryStatus::Active,
        group: Some("varaosabotti".to_string()),
        parent: None,
    }
}
