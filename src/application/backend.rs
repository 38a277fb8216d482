// Backend access trait and failure taxonomy
use crate::domain::snapshot::DashboardSnapshot;
use async_trait::async_trait;
use thiserror::Error;

/// Ways a backend round trip can fail. The refresh orchestrator treats all
/// of them the same way; the distinction exists for the logs.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("backend returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("could not decode response body: {0}")]
    Decode(#[source] reqwest::Error),
}

#[async_trait]
pub trait DashboardBackend: Send + Sync {
    /// Fetch the current analysis snapshot from `/dashboard_data`.
    async fn fetch_dashboard(&self) -> Result<DashboardSnapshot, BackendError>;

    /// Fetch the full text report for a given analysis date.
    async fn fetch_report(&self, end_date: &str) -> Result<String, BackendError>;
}
