use serde::de::DeserializeOwned;
use std::future::Future;
use std::marker::PhantomData;
use std::time::Duration;
use telemetry_config::ServiceConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded with {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Something that produces one `T` per call, usually over the network.
pub trait Fetch<T>: Send {
    fn fetch(&mut self) -> impl Future<Output = Result<T, FetchError>> + Send;
}

/// HTTP client shared by both endpoints. Every request is bounded by the
/// configured timeout.
pub fn build_http_client(config: &ServiceConfig) -> Result<reqwest::Client, FetchError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(config.request_timeout_ms))
        .build()?;
    Ok(client)
}

/// `GET url` and decode the JSON body as `T`.
pub struct JsonEndpoint<T> {
    client: reqwest::Client,
    url: String,
    _payload: PhantomData<fn() -> T>,
}

impl<T> JsonEndpoint<T> {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            _payload: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> Fetch<T> for JsonEndpoint<T> {
    async fn fetch(&mut self) -> Result<T, FetchError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
