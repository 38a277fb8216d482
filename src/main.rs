// Main entry point - dependency injection and the terminal event loop
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use futures::StreamExt;

use crate::application::refresh_service::{RefreshService, UiState};
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::http_backend::HttpBackend;
use crate::presentation::tui::{self, UiAction};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = load_dashboard_config()?;
    tracing::info!(backend = %config.backend.base_url, "starting invest-dashboard");

    // Backend (infrastructure layer)
    let backend = Arc::new(HttpBackend::new(config.backend.base_url.clone()));

    // Shared UI state and the refresh orchestrator (application layer)
    let state = Arc::new(RwLock::new(UiState::new()));
    let service = Arc::new(RefreshService::new(
        backend,
        state.clone(),
        PathBuf::from(&config.ui.report_dir),
    ));

    // Periodic refresh; the first tick fires immediately and is the initial
    // load. The guard cancels the timer when the view goes away.
    let _recurring =
        service.spawn_recurring(Duration::from_secs(config.ui.refresh_interval_secs));

    let mut terminal = tui::setup_terminal()?;
    let run = event_loop(&mut terminal, &service, &state, config.ui.redraw_ms).await;

    // View teardown: drop every live chart instance before leaving the
    // terminal; the recurring guard aborts the timer when it goes out of
    // scope below.
    state.write().unwrap().charts.clear();
    tui::teardown_terminal(&mut terminal)?;
    run
}

async fn event_loop(
    terminal: &mut tui::Term,
    service: &Arc<RefreshService>,
    state: &Arc<RwLock<UiState>>,
    redraw_ms: u64,
) -> anyhow::Result<()> {
    let mut events = crossterm::event::EventStream::new();
    let mut redraw = tokio::time::interval(Duration::from_millis(redraw_ms));

    loop {
        {
            let st = state.read().unwrap();
            terminal.draw(|f| tui::render(f, &st))?;
        }

        tokio::select! {
            Some(Ok(event)) = events.next() => {
                let notice_open = state.read().unwrap().view.notice.is_some();
                match tui::handle_event(&event, notice_open) {
                    Some(UiAction::Quit) => break,
                    Some(UiAction::DismissNotice) => {
                        state.write().unwrap().view.notice = None;
                    }
                    Some(UiAction::Refresh) => {
                        // The control is disabled while a refresh it started
                        // is in flight; the timer is not held back by it.
                        if state.read().unwrap().view.refresh.enabled() {
                            let service = Arc::clone(service);
                            tokio::spawn(async move { service.refresh().await });
                        }
                    }
                    Some(UiAction::DownloadReport) => {
                        if state.read().unwrap().view.download.enabled() {
                            let service = Arc::clone(service);
                            tokio::spawn(async move { service.download_report().await });
                        }
                    }
                    None => {}
                }
            }
            _ = redraw.tick() => {
                // Keeps the header clock and busy indicators current.
            }
        }
    }

    Ok(())
}
