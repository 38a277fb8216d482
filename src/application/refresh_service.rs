// Refresh orchestrator - fetch, render, busy-state and failure reporting
use crate::application::backend::DashboardBackend;
use crate::application::charts::ChartSlots;
use crate::application::renderer::apply_snapshot;
use crate::domain::view::ViewState;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;

const REFRESH_FAILED_NOTICE: &str =
    "Failed to load dashboard data. Please check the backend server.";
const DOWNLOAD_FAILED_NOTICE: &str =
    "Failed to load investment report. Please check the backend server.";

/// Shared UI state: the rendered view plus the live chart instances. Owned
/// here because the orchestrator is the only writer of whole snapshots.
#[derive(Debug, Default)]
pub struct UiState {
    pub view: ViewState,
    pub charts: ChartSlots,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Drives the fetch → render cycle and the report download. Locks on the
/// shared state are only held across the synchronous sections on either side
/// of the network call, never across it, so overlapping refreshes interleave
/// at the suspension point exactly like the original view did.
pub struct RefreshService {
    backend: Arc<dyn DashboardBackend>,
    state: Arc<RwLock<UiState>>,
    report_dir: PathBuf,
}

impl RefreshService {
    pub fn new(
        backend: Arc<dyn DashboardBackend>,
        state: Arc<RwLock<UiState>>,
        report_dir: PathBuf,
    ) -> Self {
        Self {
            backend,
            state,
            report_dir,
        }
    }

    /// One refresh cycle. The trigger control engaged on entry is released
    /// on every exit path; a failed fetch leaves the previously rendered
    /// view fully intact.
    pub async fn refresh(&self) {
        tracing::debug!("fetching dashboard data");
        {
            let mut st = self.state.write().unwrap();
            st.view.refresh.engage();
        }

        let result = self.backend.fetch_dashboard().await;

        let mut st = self.state.write().unwrap();
        match result {
            Ok(snapshot) => {
                let ui = &mut *st;
                apply_snapshot(&snapshot, &mut ui.view, &mut ui.charts);
                tracing::info!(
                    date = %ui.view.as_of_date,
                    live_charts = ui.charts.live_count(),
                    "dashboard refreshed"
                );
            }
            Err(e) => {
                tracing::error!("dashboard refresh failed: {e}");
                st.view.notice = Some(REFRESH_FAILED_NOTICE.to_string());
            }
        }
        st.view.refresh.release();
    }

    /// Fetch the report for the currently displayed date and save it next to
    /// the process as `investment_report_<date>.txt`.
    pub async fn download_report(&self) {
        let date = {
            let mut st = self.state.write().unwrap();
            st.view.download.engage();
            st.view.as_of_date.clone()
        };

        tracing::debug!(%date, "retrieving full investment report");
        let result = self.backend.fetch_report(&date).await;

        let saved = match result {
            Ok(report) => {
                let path = self
                    .report_dir
                    .join(format!("investment_report_{date}.txt"));
                match tokio::fs::write(&path, report).await {
                    Ok(()) => {
                        tracing::info!(path = %path.display(), "report saved");
                        Ok(())
                    }
                    Err(e) => {
                        tracing::error!("could not save report to {}: {e}", path.display());
                        Err(())
                    }
                }
            }
            Err(e) => {
                tracing::error!("report download failed: {e}");
                Err(())
            }
        };

        let mut st = self.state.write().unwrap();
        if saved.is_err() {
            st.view.notice = Some(DOWNLOAD_FAILED_NOTICE.to_string());
        }
        st.view.download.release();
    }

    /// Fire `refresh()` on a fixed period. The first tick is immediate, which
    /// doubles as the initial load. The returned guard aborts the task when
    /// dropped, so no timer outlives the view.
    pub fn spawn_recurring(self: &Arc<Self>, interval: Duration) -> RecurringRefresh {
        let service = Arc::clone(self);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                service.refresh().await;
            }
        });
        RecurringRefresh { task }
    }
}

/// Guard for the periodic refresh task; its lifetime is the view's lifetime.
pub struct RecurringRefresh {
    task: JoinHandle<()>,
}

impl Drop for RecurringRefresh {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::backend::{BackendError, DashboardBackend};
    use crate::application::charts::ChartSlotId;
    use crate::domain::snapshot::DashboardSnapshot;
    use async_trait::async_trait;

    struct StubBackend {
        dashboard: Result<serde_json::Value, ()>,
        report: Result<String, ()>,
    }

    impl StubBackend {
        fn ok() -> Self {
            Self {
                dashboard: Ok(sample_payload()),
                report: Ok("full report text".to_string()),
            }
        }

        fn failing() -> Self {
            Self {
                dashboard: Err(()),
                report: Err(()),
            }
        }
    }

    #[async_trait]
    impl DashboardBackend for StubBackend {
        async fn fetch_dashboard(&self) -> Result<DashboardSnapshot, BackendError> {
            match &self.dashboard {
                Ok(value) => Ok(serde_json::from_value(value.clone()).unwrap()),
                Err(()) => Err(BackendError::Status(reqwest::StatusCode::BAD_GATEWAY)),
            }
        }

        async fn fetch_report(&self, _end_date: &str) -> Result<String, BackendError> {
            match &self.report {
                Ok(text) => Ok(text.clone()),
                Err(()) => Err(BackendError::Status(reqwest::StatusCode::NOT_FOUND)),
            }
        }
    }

    fn sample_payload() -> serde_json::Value {
        serde_json::json!({
            "main_info": { "date": "09-09-2025", "last_price": 27.85 },
            "main_decision": {
                "decision": "HOLD",
                "decision_color": "#f59e0b",
                "confidence": 71,
                "confidence_color": "#f59e0b",
                "ai_reasoning": "Mixed signals.",
                "key_factors": ["Flat momentum"]
            },
            "lstm_prediction": {
                "prediction_score": 27.9,
                "prediction_interval": "27.0 - 28.8",
                "chart_data": [27.1, 27.5],
                "chart_labels": ["Day -1", "Today"]
            },
            "social_sentiment": {
                "sentiment_score": 0.41,
                "chart_data": [0.4, 0.41],
                "chart_labels": ["Week -1", "Current"],
                "summary": "Negative sentiment"
            },
            "event_impact": { "events": [] },
            "memory_bank": { "scenarios_found": 2, "success_rate": 50.0, "insight": "" }
        })
    }

    fn service_with(backend: StubBackend, report_dir: PathBuf) -> (Arc<RefreshService>, Arc<RwLock<UiState>>) {
        let state = Arc::new(RwLock::new(UiState::new()));
        let service = Arc::new(RefreshService::new(
            Arc::new(backend),
            state.clone(),
            report_dir,
        ));
        (service, state)
    }

    #[tokio::test]
    async fn successful_refresh_applies_snapshot_and_releases_control() {
        let (service, state) = service_with(StubBackend::ok(), PathBuf::from("."));
        service.refresh().await;

        let st = state.read().unwrap();
        assert_eq!(st.view.as_of_date, "09-09-2025");
        assert_eq!(st.view.decision_label, "HOLD");
        assert_eq!(st.charts.live_count(), 2);
        assert!(st.view.refresh.enabled());
        assert_eq!(st.view.refresh.label(), "Refresh Analysis");
        assert!(st.view.notice.is_none());
    }

    #[tokio::test]
    async fn failed_refresh_leaves_prior_view_intact() {
        let (service, state) = service_with(StubBackend::ok(), PathBuf::from("."));
        service.refresh().await;

        let before = state.read().unwrap().view.clone();

        // Swap in a failing backend for the second cycle.
        let failing = Arc::new(RefreshService::new(
            Arc::new(StubBackend::failing()),
            state.clone(),
            PathBuf::from("."),
        ));
        failing.refresh().await;

        let st = state.read().unwrap();
        assert_eq!(st.view.notice.as_deref(), Some(REFRESH_FAILED_NOTICE));
        assert!(st.view.refresh.enabled());
        assert_eq!(st.view.refresh.label(), "Refresh Analysis");
        // Every rendered region still shows the last good snapshot.
        assert_eq!(st.view.as_of_date, before.as_of_date);
        assert_eq!(st.view.decision_label, before.decision_label);
        assert_eq!(st.view.key_factors, before.key_factors);
        assert_eq!(st.view.lstm_score, before.lstm_score);
        assert!(st.charts.get(ChartSlotId::Prediction).is_some());
    }

    #[tokio::test]
    async fn failed_refresh_on_empty_view_keeps_placeholders() {
        let (service, state) = service_with(StubBackend::failing(), PathBuf::from("."));
        service.refresh().await;

        let st = state.read().unwrap();
        assert_eq!(st.view.as_of_date, "--");
        assert_eq!(st.charts.live_count(), 0);
        assert!(st.view.notice.is_some());
        assert!(st.view.refresh.enabled());
    }

    #[tokio::test]
    async fn download_saves_report_keyed_by_displayed_date() {
        let dir = tempfile::tempdir().unwrap();
        let (service, state) = service_with(StubBackend::ok(), dir.path().to_path_buf());
        service.refresh().await;
        service.download_report().await;

        let path = dir.path().join("investment_report_09-09-2025.txt");
        let contents = std::fs::read_to_string(path).unwrap();
        assert_eq!(contents, "full report text");

        let st = state.read().unwrap();
        assert!(st.view.download.enabled());
        assert!(st.view.notice.is_none());
    }

    #[tokio::test]
    async fn failed_download_sets_notice_and_releases_control() {
        let dir = tempfile::tempdir().unwrap();
        let (service, state) = service_with(StubBackend::failing(), dir.path().to_path_buf());
        service.download_report().await;

        let st = state.read().unwrap();
        assert_eq!(st.view.notice.as_deref(), Some(DOWNLOAD_FAILED_NOTICE));
        assert!(st.view.download.enabled());
        assert_eq!(st.view.download.label(), "Download Report");
    }
}
