use reqwest::StatusCode;

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("unexpected status {status}")]
    Status { status: StatusCode },
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum MonitorError {
    #[error("category '{query}' not found on page")]
    CategoryNotFound {
        query: String,
        suggestions: Vec<String>,
    },
}
