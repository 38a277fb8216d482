// HTTP backend implementation
use crate::application::backend::{BackendError, DashboardBackend};
use crate::domain::snapshot::DashboardSnapshot;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl DashboardBackend for HttpBackend {
    async fn fetch_dashboard(&self) -> Result<DashboardSnapshot, BackendError> {
        let response = self
            .client
            .get(self.url("dashboard_data"))
            .send()
            .await
            .map_err(BackendError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status));
        }

        response
            .json::<DashboardSnapshot>()
            .await
            .map_err(BackendError::Decode)
    }

    async fn fetch_report(&self, end_date: &str) -> Result<String, BackendError> {
        let response = self
            .client
            .get(self.url("download_report"))
            .query(&[("end_date", end_date)])
            .send()
            .await
            .map_err(BackendError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status));
        }

        response.text().await.map_err(BackendError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let backend = HttpBackend::new("http://127.0.0.1:8000/".to_string());
        assert_eq!(backend.url("dashboard_data"), "http://127.0.0.1:8000/dashboard_data");
    }
}
