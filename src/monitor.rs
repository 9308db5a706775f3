use std::thread;
use std::time::Duration;

use chrono::{DateTime, Local};
use log::{debug, info, warn};

use crate::error::{FetchError, MonitorError};
use crate::fetcher::FetchPage;
use crate::matcher;
use crate::models::Category;
use crate::notifier::Alert;
use crate::parser;

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub url: String,
    pub query: String,
    pub interval: Duration,
    pub once: bool,
}

/// Carried from one poll to the next; nothing else survives between polls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonitorState {
    pub previously_active: bool,
    pub last_alert_at: Option<DateTime<Local>>,
}

/// What a single poll concluded about the watched category.
#[derive(Debug, Clone, PartialEq)]
pub enum Check {
    NotFound,
    /// Newly active matches, each of which was alerted.
    BecameActive(Vec<Category>),
    StillActive,
    Inactive(Vec<Category>),
}

pub struct Monitor<F, A> {
    fetcher: F,
    alert: A,
    config: MonitorConfig,
}

impl<F: FetchPage, A: Alert> Monitor<F, A> {
    pub fn new(fetcher: F, alert: A, config: MonitorConfig) -> Self {
        Self { fetcher, alert, config }
    }

    /// Checks the query resolves before polling starts.
    ///
    /// Returns the page's categories so the first poll can reuse them, or `None`
    /// when the page could not be fetched.
    pub fn validate(&self) -> Result<Option<Vec<Category>>, MonitorError> {
        let categories = match self.fetcher.fetch(&self.config.url) {
            Ok(html) => parser::extract(&html),
            Err(e) => {
                warn!("Could not validate category ({}). Starting monitor anyway.", e);
                return Ok(None);
            }
        };

        let matches = matcher::find(&categories, &self.config.query);
        if matches.is_empty() {
            return Err(MonitorError::CategoryNotFound {
                query: self.config.query.clone(),
                suggestions: matcher::suggest(&categories, &self.config.query),
            });
        }

        info!(
            "Monitoring '{}' ({} match(es)) on {} (interval: {}s)",
            self.config.query,
            matches.len(),
            self.config.url,
            self.config.interval.as_secs()
        );
        for m in &matches {
            info!("  Matched: {}", m.label());
        }
        Ok(Some(categories))
    }

    /// Validates, then polls until `once` is set or the process is stopped.
    pub fn run(&self) -> Result<(), MonitorError> {
        let mut prefetched = self.validate()?;
        let mut state = MonitorState::default();

        loop {
            state = self.poll(state, prefetched.take());
            if self.config.once {
                break;
            }
            thread::sleep(self.config.interval);
        }
        Ok(())
    }

    /// One iteration: fetch (unless categories are supplied), match and alert.
    /// Fetch failures leave the state untouched.
    pub fn poll(&self, state: MonitorState, prefetched: Option<Vec<Category>>) -> MonitorState {
        let categories = match prefetched {
            Some(categories) => categories,
            None => match self.fetcher.fetch(&self.config.url) {
                Ok(html) => parser::extract(&html),
                Err(FetchError::Status { status }) => {
                    warn!("HTTP error {} fetching page. Will retry.", status.as_u16());
                    return state;
                }
                Err(e) => {
                    warn!("Network error fetching page. Will retry. ({})", e);
                    return state;
                }
            },
        };

        let (state, _) = self.check(state, &categories);
        state
    }

    pub fn check(&self, state: MonitorState, categories: &[Category]) -> (MonitorState, Check) {
        let matches = matcher::find(categories, &self.config.query);

        if matches.is_empty() {
            warn!("Category '{}' no longer found on page.", self.config.query);
            return (state, Check::NotFound);
        }

        let active: Vec<Category> = matches
            .iter()
            .filter(|m| m.is_active())
            .map(|&m| m.clone())
            .collect();

        if active.is_empty() {
            for m in &matches {
                info!("Still inactive: {}", m.label());
            }
            let inactive = matches.into_iter().cloned().collect();
            let state = MonitorState { previously_active: false, ..state };
            return (state, Check::Inactive(inactive));
        }

        if state.previously_active {
            match state.last_alert_at {
                Some(at) => debug!(
                    "Category '{}' is still active (notified at {}).",
                    self.config.query,
                    at.format("%Y-%m-%d %H:%M:%S")
                ),
                None => debug!("Category '{}' is still active (already notified).", self.config.query),
            }
            return (state, Check::StillActive);
        }

        for m in &active {
            self.alert.alert(m, &self.config.url);
        }
        let state = MonitorState {
            previously_active: true,
            last_alert_at: Some(Local::now()),
        };
        (state, Check::BecameActive(active))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use reqwest::StatusCode;

    use super::*;
    use crate::models::CategoryStatus;

    struct ScriptedFetcher {
        pages: RefCell<VecDeque<Result<String, FetchError>>>,
    }

    impl ScriptedFetcher {
        fn new(pages: Vec<Result<String, FetchError>>) -> Self {
            Self { pages: RefCell::new(pages.into()) }
        }
    }

    impl FetchPage for ScriptedFetcher {
        fn fetch(&self, _url: &str) -> Result<String, FetchError> {
            self.pages
                .borrow_mut()
                .pop_front()
                .unwrap_or(Err(FetchError::Status { status: StatusCode::NOT_FOUND }))
        }
    }

    #[derive(Default)]
    struct RecordingAlert {
        seen: RefCell<Vec<String>>,
    }

    impl Alert for RecordingAlert {
        fn alert(&self, category: &Category, _url: &str) {
            self.seen.borrow_mut().push(category.title.clone());
        }
    }

    fn page(brakes: bool, filters: bool) -> String {
        let class = |on: bool| if on { "my-2" } else { "my-2 disabled-link" };
        format!(
            r#"<div class="col-12"><h4>Moottori</h4>
            <div ngbdropdown class="col-lg-4">
              <a queryparamshandling="preserve" class="{}" title="Jarrut"><span>Jarrut</span></a>
            </div>
            <div ngbdropdown class="col-lg-4">
              <a ngbdropdowntoggle queryparamshandling="preserve" class="my-2" title="Suodattimet"><span>Suodattimet</span></a>
              <a ngbdropdownitem class="{}" title="Ilmansuodatin"><span>Ilmansuodatin</span></a>
              <a ngbdropdownitem class="{}" title="Jarrut"><span>Jarrut</span></a>
            </div></div>"#,
            class(brakes),
            class(filters),
            class(filters)
        )
    }

    fn monitor(query: &str, pages: Vec<Result<String, FetchError>>) -> Monitor<ScriptedFetcher, RecordingAlert> {
        Monitor::new(
            ScriptedFetcher::new(pages),
            RecordingAlert::default(),
            MonitorConfig {
                url: "https://example.com/osat".into(),
                query: query.into(),
                interval: Duration::from_secs(1),
                once: true,
            },
        )
    }

    #[test]
    fn alerts_once_per_activation() {
        crate::logging::init_for_tests();
        let m = monitor(
            "Moottori / Jarrut",
            vec![
                Ok(page(false, false)),
                Ok(page(true, false)),
                Ok(page(true, false)),
                Ok(page(false, false)),
                Ok(page(true, false)),
            ],
        );

        let mut state = MonitorState::default();
        for _ in 0..5 {
            state = m.poll(state, None);
        }
        assert_eq!(*m.alert.seen.borrow(), ["Jarrut", "Jarrut"]);
        assert!(state.previously_active);
        assert!(state.last_alert_at.is_some());
    }

    #[test]
    fn each_newly_active_match_is_alerted() {
        let m = monitor("Jarrut", vec![]);
        let cats = parser::extract(&page(true, true));
        let (state, check) = m.check(MonitorState::default(), &cats);

        let Check::BecameActive(active) = check else {
            panic!("expected activation, got {:?}", check);
        };
        assert_eq!(active.len(), 2);
        assert_eq!(active[1].parent.as_deref(), Some("Suodattimet"));
        assert_eq!(m.alert.seen.borrow().len(), 2);

        let (_, check) = m.check(state, &cats);
        assert_eq!(check, Check::StillActive);
        assert_eq!(m.alert.seen.borrow().len(), 2);
    }

    #[test]
    fn inactive_resets_and_not_found_keeps_state() {
        let m = monitor("Ilmansuodatin", vec![]);
        let active = MonitorState { previously_active: true, last_alert_at: None };

        let (state, check) = m.check(active.clone(), &[]);
        assert_eq!(check, Check::NotFound);
        assert_eq!(state, active);

        let (state, check) = m.check(active, &parser::extract(&page(true, false)));
        assert!(matches!(check, Check::Inactive(ref v) if v.len() == 1));
        assert!(!state.previously_active);
        assert!(m.alert.seen.borrow().is_empty());
    }

    #[test]
    fn fetch_errors_leave_state_alone() {
        let m = monitor(
            "Jarrut",
            vec![Err(FetchError::Status { status: StatusCode::SERVICE_UNAVAILABLE })],
        );
        let before = MonitorState { previously_active: true, last_alert_at: None };
        assert_eq!(m.poll(before.clone(), None), before);
    }

    #[test]
    fn prefetched_categories_skip_the_fetch() {
        let m = monitor("Moottori / Jarrut", vec![]);
        let cats = parser::extract(&page(true, false));
        let state = m.poll(MonitorState::default(), Some(cats));
        assert!(state.previously_active);
        assert_eq!(*m.alert.seen.borrow(), ["Jarrut"]);
    }

    #[test]
    fn validate_reports_suggestions() {
        let m = monitor("suodat", vec![Ok(page(false, false))]);
        match m.validate() {
            Err(MonitorError::CategoryNotFound { query, suggestions }) => {
                assert_eq!(query, "suodat");
                assert_eq!(
                    suggestions,
                    ["Suodattimet  (Moottori)", "Suodattimet / Ilmansuodatin  (Moottori)"]
                );
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn validate_tolerates_fetch_failure() {
        let m = monitor("Jarrut", vec![]);
        assert!(matches!(m.validate(), Ok(None)));

        let m = monitor("Jarrut", vec![Ok(page(false, false))]);
        let cats = m.validate().unwrap().unwrap();
        assert_eq!(cats.len(), 4);
        assert_eq!(cats.iter().filter(|c| c.status == CategoryStatus::Active).count(), 1);
    }

    #[test]
    fn run_once_polls_a_single_time() {
        let m = monitor("Moottori / Jarrut", vec![Ok(page(true, false))]);
        m.run().unwrap();
        assert_eq!(*m.alert.seen.borrow(), ["Jarrut"]);
    }
}
