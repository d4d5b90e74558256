use crate::error::{ErrorKind, Result};
use crate::payload::Payload;
use crate::source::{ApodSource, ImageBody};
use apod_config::UpstreamConfig;
use async_trait::async_trait;
use exn::ResultExt;
use futures::TryStreamExt;
use reqwest::{Client, Response, Url};
use std::io;
use std::time::Duration;
use tokio_util::io::StreamReader;
use tracing::instrument;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the APOD JSON endpoint and the images it links to.
#[derive(Clone)]
pub struct UpstreamClient {
    http: Client,
    /// Endpoint with the `api_key` query pair already appended.
    endpoint: Url,
    /// Endpoint as configured, safe to log.
    display_url: String,
    request_timeout: Duration,
    download_timeout: Duration,
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("endpoint", &self.display_url)
            .field("request_timeout", &self.request_timeout)
            .field("download_timeout", &self.download_timeout)
            .finish_non_exhaustive()
    }
}

impl UpstreamClient {
    /// Build a client for the configured endpoint.
    ///
    /// The API key is appended as a properly encoded query pair, keeping any
    /// query string the endpoint already has.
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let mut endpoint =
            Url::parse(&config.api_url).or_raise(|| ErrorKind::InvalidUrl(config.api_url.clone()))?;
        endpoint.query_pairs_mut().append_pair("api_key", &config.api_key);
        let http = Client::builder().user_agent(USER_AGENT).build().or_raise(|| ErrorKind::Network)?;
        Ok(Self {
            http,
            endpoint,
            display_url: config.api_url.clone(),
            request_timeout: config.request_timeout,
            download_timeout: config.download_timeout,
        })
    }

    async fn send(&self, url: Url, timeout: Duration) -> Result<Response> {
        let response = match self.http.get(url).timeout(timeout).send().await {
            Ok(response) => response,
            Err(err) => {
                let kind = ErrorKind::from_transport(&err);
                return Err(err).or_raise(|| kind);
            },
        };
        let status = response.status();
        if !status.is_success() {
            exn::bail!(ErrorKind::Status(status.as_u16()));
        }
        Ok(response)
    }
}

#[async_trait]
impl ApodSource for UpstreamClient {
    #[instrument(skip(self), fields(endpoint = %self.display_url))]
    async fn fetch_latest(&self) -> Result<Payload> {
        let response = self.send(self.endpoint.clone(), self.request_timeout).await?;
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(err) => {
                let kind = ErrorKind::from_transport(&err);
                return Err(err).or_raise(|| kind);
            },
        };
        let payload: Payload = serde_json::from_slice(&body).or_raise(|| ErrorKind::Decode)?;
        if payload.title.trim().is_empty() {
            exn::bail!(ErrorKind::Decode);
        }
        tracing::debug!(date = %payload.date, "fetched payload");
        Ok(payload)
    }

    #[instrument(skip(self))]
    async fn download_image(&self, url: &str) -> Result<ImageBody> {
        let url = Url::parse(url).or_raise(|| ErrorKind::InvalidUrl(url.to_string()))?;
        let response = self.send(url, self.download_timeout).await?;
        if let Some(length) = response.content_length() {
            tracing::debug!(bytes = length, "image download started");
        }
        let stream = response.bytes_stream().map_err(io::Error::other);
        Ok(Box::pin(StreamReader::new(stream)))
    }
}
