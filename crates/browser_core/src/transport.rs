//! The two remote services behind the views: procedure search and program
//! analysis.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    error::ApiError,
    protocol::{
        escape_path_segment, InnerProcedureSearchResponse, ProcedureResponse,
        ProcedureSearchResponse,
    },
};
use tracing::debug;
use url::Url;

use crate::{
    error::FetchError, program_view::ProgramIdentity, query::SearchQuery, results::RawResults,
};

#[async_trait]
pub trait ProcedureService: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<RawResults, FetchError>;
    async fn fetch_program(
        &self,
        identity: &ProgramIdentity,
    ) -> Result<ProcedureResponse, FetchError>;
}

/// Talks to the analysis server over HTTP.
pub struct HttpProcedureService {
    http: Client,
    base_url: Url,
    timeout: Duration,
}

impl HttpProcedureService {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("'{base_url}' cannot carry request paths");
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends `segments` below the base path, each percent-encoded as a
    /// single segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                FetchError::Transport(format!("'{}' cannot carry request paths", self.base_url))
            })?
            .pop_if_empty()
            .extend(
                segments
                    .iter()
                    .map(|segment| urlencoding::encode(&escape_path_segment(segment)).into_owned()),
            );
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, FetchError> {
        let url = self.endpoint(segments)?;
        debug!(%url, "GET");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(err) => {
                    debug!(%status, error = %err, "could not read error body");
                    String::new()
                }
            };
            return Err(status_error(status, &body));
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        serde_json::from_slice(&body).map_err(|e| FetchError::Malformed(e.to_string()))
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl ProcedureService for HttpProcedureService {
    async fn search(&self, query: &SearchQuery) -> Result<RawResults, FetchError> {
        let segments = query.api_segments();
        if query.is_scoped() {
            let response: InnerProcedureSearchResponse = self.get_json(&segments).await?;
            Ok(response.into())
        } else {
            let response: ProcedureSearchResponse = self.get_json(&segments).await?;
            Ok(response.into())
        }
    }

    async fn fetch_program(
        &self,
        identity: &ProgramIdentity,
    ) -> Result<ProcedureResponse, FetchError> {
        self.get_json(&identity.api_segments()).await
    }
}

/// Prefers the server's own error message; falls back to the status reason.
fn status_error(status: StatusCode, body: &str) -> FetchError {
    let message = match serde_json::from_str::<ApiError>(body) {
        Ok(api) => api.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string(),
    };
    FetchError::Status {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
