//! HTTP client for the complaint service.
//!
//! Issues one `GET` per fetch with the non-`"all"` filters as query
//! parameters. There is no automatic retry: a failed fetch is reported to
//! the caller and the user decides whether to refresh.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use complaint_map_dashboard_models::FilterState;

use crate::envelope::{error_message, parse_envelope};
use crate::progress::{ProgressCallback, null_progress};
use crate::{ComplaintSnapshot, ComplaintSource, SourceError};

/// A [`ComplaintSource`] backed by the complaint service's REST endpoint.
pub struct HttpComplaintSource {
    client: reqwest::Client,
    base_url: String,
    progress: Arc<dyn ProgressCallback>,
}

impl HttpComplaintSource {
    /// Creates a client for the endpoint at `base_url` (e.g.
    /// `"https://city.example/api/complaints"`).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            progress: null_progress(),
        })
    }

    /// Reports request progress to `progress`.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressCallback>) -> Self {
        self.progress = progress;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request(&self, filters: &FilterState) -> Result<ComplaintSnapshot, SourceError> {
        let params = filters.query_pairs();
        log::debug!("GET {} {params:?}", self.base_url);

        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = error_message(status.as_u16(), &text);
            log::warn!("{} returned {status}: {message}", self.base_url);
            return Err(SourceError::Status {
                status: status.as_u16(),
                message,
            });
        }

        self.progress
            .set_message(format!("Parsing {} bytes", text.len()));
        let body: serde_json::Value = serde_json::from_str(&text)?;
        parse_envelope(&body)
    }
}

#[async_trait]
impl ComplaintSource for HttpComplaintSource {
    fn name(&self) -> &str {
        &self.base_url
    }

    async fn fetch(&self, filters: &FilterState) -> Result<ComplaintSnapshot, SourceError> {
        self.progress.set_message("Fetching complaints".to_string());

        let result = self.request(filters).await;

        match &result {
            Ok(snapshot) => self
                .progress
                .finish(format!("Fetched {} complaints", snapshot.records.len())),
            Err(_) => self.progress.finish_and_clear(),
        }
        result
    }
}
