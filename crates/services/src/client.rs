use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use lab_core::model::{ExperimentId, ProgressRecord, ProgressUpdate, UserId};

use crate::error::ClientError;
use crate::progress_service::ProgressService;

/// The two calls a player needs from the progress backend.
///
/// Any transport that satisfies these is enough: in-process for tests and
/// single-binary setups, HTTP for the browser-facing deployment.
#[async_trait]
pub trait ProgressClient: Send + Sync {
    /// # Errors
    ///
    /// Returns `ClientError` if the backend cannot be reached.
    async fn fetch_progress(
        &self,
        user_id: &UserId,
        experiment_id: ExperimentId,
    ) -> Result<Option<ProgressRecord>, ClientError>;

    /// # Errors
    ///
    /// Returns `ClientError` if the write is rejected or cannot be delivered.
    async fn save_progress(&self, update: ProgressUpdate) -> Result<ProgressRecord, ClientError>;
}

/// Calls `ProgressService` directly, without a network hop.
#[derive(Clone)]
pub struct LocalProgressClient {
    service: ProgressService,
}

impl LocalProgressClient {
    #[must_use]
    pub fn new(service: ProgressService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ProgressClient for LocalProgressClient {
    async fn fetch_progress(
        &self,
        user_id: &UserId,
        experiment_id: ExperimentId,
    ) -> Result<Option<ProgressRecord>, ClientError> {
        Ok(self.service.get_progress(user_id, experiment_id).await?)
    }

    async fn save_progress(&self, update: ProgressUpdate) -> Result<ProgressRecord, ClientError> {
        Ok(self.service.save_progress(update).await?)
    }
}

/// JSON client for the lab server's `/api/progress` routes.
#[derive(Clone)]
pub struct HttpProgressClient {
    client: Client,
    base_url: Url,
}

impl HttpProgressClient {
    /// # Errors
    ///
    /// Returns `ClientError::InvalidBaseUrl` if `base_url` is not an absolute
    /// http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let parsed =
            Url::parse(base_url).map_err(|_| ClientError::InvalidBaseUrl(base_url.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            client: Client::new(),
            base_url: parsed,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// List every record for a user (dashboard view).
    ///
    /// # Errors
    ///
    /// Returns `ClientError` for transport failures or non-success statuses.
    pub async fn list_progress(&self, user_id: &UserId) -> Result<Vec<ProgressRecord>, ClientError> {
        let url = self.endpoint(&["api", "progress", user_id.as_str()])?;
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::HttpStatus(response.status()));
        }
        let body: ProgressList = response.json().await?;
        Ok(body.progress)
    }
}

#[derive(Debug, serde::Deserialize)]
struct ProgressList {
    progress: Vec<ProgressRecord>,
}

#[async_trait]
impl ProgressClient for HttpProgressClient {
    async fn fetch_progress(
        &self,
        user_id: &UserId,
        experiment_id: ExperimentId,
    ) -> Result<Option<ProgressRecord>, ClientError> {
        let experiment = experiment_id.to_string();
        let url = self.endpoint(&["api", "progress", user_id.as_str(), &experiment])?;
        let response = self.client.get(url).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json().await?)),
            status => Err(ClientError::HttpStatus(status)),
        }
    }

    async fn save_progress(&self, update: ProgressUpdate) -> Result<ProgressRecord, ClientError> {
        let url = self.endpoint(&["api", "progress"])?;
        let response = self.client.post(url).json(&update).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_encodes_user_segments() {
        let client = HttpProgressClient::new("http://127.0.0.1:8080/").unwrap();
        let url = client.endpoint(&["api", "progress", "a b/c", "3"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/api/progress/a%20b%2Fc/3");
    }

    #[test]
    fn endpoint_keeps_dotted_user_segments() {
        let client = HttpProgressClient::new("http://127.0.0.1:8080/").unwrap();
        for raw in ["...", ".a", "a.."] {
            let user = UserId::new(raw).unwrap();
            let url = client
                .endpoint(&["api", "progress", user.as_str(), "9"])
                .unwrap();
            assert_eq!(url.path_segments().unwrap().nth(2), Some(raw));
            assert_eq!(url.path_segments().unwrap().count(), 4);
        }
        assert!(UserId::new("..").is_err());
        assert!(UserId::new(".").is_err());
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let client = HttpProgressClient::new("http://lab.local/backend").unwrap();
        let url = client.endpoint(&["api", "progress"]).unwrap();
        assert_eq!(url.as_str(), "http://lab.local/backend/api/progress");
    }

    #[test]
    fn rejects_relative_base_url() {
        assert!(matches!(
            HttpProgressClient::new("/api"),
            Err(ClientError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            HttpProgressClient::new("mailto:lab@example.com"),
            Err(ClientError::InvalidBaseUrl(_))
        ));
    }
}
