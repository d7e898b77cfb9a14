//! Client for the remote file server that holds the program sources.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::domain::ProcedurePath;
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum FileServerError {
    #[error("'{0}' does not exist on the file server")]
    NotFound(String),
    #[error("file server returned status {0}")]
    Status(u16),
    #[error("file server request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid file server url: {0}")]
    Url(#[from] url::ParseError),
}

#[async_trait]
pub trait FileServer: Send + Sync {
    async fn fetch_file(&self, path: &ProcedurePath) -> Result<Vec<u8>, FileServerError>;
    async fn find(&self, query: &str) -> Result<Vec<ProcedurePath>, FileServerError>;
}

pub struct HttpFileServer {
    http: Client,
    base: Url,
}

impl HttpFileServer {
    pub fn new(base: Url, timeout: Duration) -> Result<Self, FileServerError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base })
    }

    /// `path` keeps its `/` separators. A `.` or `..` segment would resolve
    /// outside `route/`, so such paths are reported as not found.
    fn endpoint(&self, route: &str, path: &str) -> Result<Url, FileServerError> {
        let mut encoded = Vec::new();
        for segment in path.split('/') {
            if matches!(segment, "." | "..") {
                return Err(FileServerError::NotFound(path.to_string()));
            }
            encoded.push(urlencoding::encode(segment));
        }
        Ok(self.base.join(&format!("{route}/{}", encoded.join("/")))?)
    }
}

#[async_trait]
impl FileServer for HttpFileServer {
    async fn fetch_file(&self, path: &ProcedurePath) -> Result<Vec<u8>, FileServerError> {
        let url = self.endpoint("file", path.as_str())?;
        let res = self.http.get(url).send().await?;
        if res.status() != StatusCode::OK {
            return Err(FileServerError::NotFound(path.to_string()));
        }
        Ok(res.bytes().await?.to_vec())
    }

    async fn find(&self, query: &str) -> Result<Vec<ProcedurePath>, FileServerError> {
        let url = match self.endpoint("find", query) {
            Ok(url) => url,
            Err(FileServerError::NotFound(_)) => {
                debug!(query, "query cannot name a file server path");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err),
        };
        let res = self.http.get(url).send().await?;
        if res.status() != StatusCode::OK {
            return Err(FileServerError::Status(res.status().as_u16()));
        }
        Ok(res.json().await?)
    }
}
