//! Backend - Backing Service Client
//!
//! The backing service serves directory listings, file contents and icons
//! over an authenticated request/response channel.

use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use snafu::ResultExt;

use crate::domain::config::BackendConfig;
use crate::domain::file_info::{ListRequest, ListResponse, ReadRequest, Request, Response};
use crate::domain::icon::{IconFormat, IconResource};
use crate::error::{Error, Result, StatusSnafu, TransportSnafu};
use crate::services::runtime::run_in_tokio;

/// Request/response channel to the backing service
pub trait Backend: Send + Sync + 'static {
    /// Base URI, used to resolve icon identifiers
    fn base_uri(&self) -> String;

    /// Fetch the full listing of one directory
    fn list(&self, request: ListRequest) -> BoxFuture<'_, Result<ListResponse>>;

    /// Read the raw content of one record
    fn read(&self, request: ReadRequest) -> BoxFuture<'_, Result<Vec<u8>>>;

    /// Load an icon image by absolute URL
    fn fetch_icon(&self, url: String) -> BoxFuture<'_, Result<IconResource>>;
}

/// HTTP implementation of [`Backend`]
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    config: BackendConfig,
}

impl HttpBackend {
    /// Create a client for the configured service
    pub fn new(config: BackendConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .context(TransportSnafu {
                url: config.base_uri(),
            })?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/", self.config.base_uri())
    }
}

async fn post(
    client: &reqwest::Client,
    url: &str,
    token: Option<&str>,
    body: &Request,
) -> Result<reqwest::Response> {
    let mut builder = client.post(url).json(body);
    if let Some(token) = token {
        builder = builder.bearer_auth(token);
    }
    let response = builder.send().await.context(TransportSnafu { url })?;
    let status = response.status();
    if !status.is_success() {
        return StatusSnafu {
            url,
            status: status.as_u16(),
        }
        .fail();
    }
    Ok(response)
}

/// Decode a list response envelope
pub fn decode_list_response(body: &[u8]) -> Result<ListResponse> {
    match serde_json::from_slice::<Response>(body) {
        Ok(Response::List(listing)) => Ok(listing),
        Err(e) => Err(Error::Protocol {
            message: e.to_string(),
        }),
    }
}

impl Backend for HttpBackend {
    fn base_uri(&self) -> String {
        self.config.base_uri()
    }

    fn list(&self, request: ListRequest) -> BoxFuture<'_, Result<ListResponse>> {
        let client = self.client.clone();
        let url = self.endpoint();
        let token = self.config.token.clone();
        async move {
            run_in_tokio(async move {
                tracing::debug!(?request, "Listing request");
                let response = post(&client, &url, token.as_deref(), &Request::List(request)).await?;
                let body = response
                    .bytes()
                    .await
                    .context(TransportSnafu { url: url.as_str() })?;
                decode_list_response(&body)
            })
            .await
        }
        .boxed()
    }

    fn read(&self, request: ReadRequest) -> BoxFuture<'_, Result<Vec<u8>>> {
        let client = self.client.clone();
        let url = self.endpoint();
        let token = self.config.token.clone();
        async move {
            run_in_tokio(async move {
                tracing::debug!(?request, "Read request");
                let response = post(&client, &url, token.as_deref(), &Request::Read(request)).await?;
                let body = response
                    .bytes()
                    .await
                    .context(TransportSnafu { url: url.as_str() })?;
                Ok(body.to_vec())
            })
            .await
        }
        .boxed()
    }

    fn fetch_icon(&self, url: String) -> BoxFuture<'_, Result<IconResource>> {
        let client = self.client.clone();
        let token = self.config.token.clone();
        async move {
            run_in_tokio(async move {
                let mut builder = client.get(&url);
                if let Some(token) = token.as_deref() {
                    builder = builder.bearer_auth(token);
                }
                let response = builder
                    .send()
                    .await
                    .context(TransportSnafu { url: url.as_str() })?;
                let status = response.status();
                if !status.is_success() {
                    return StatusSnafu {
                        url: url.as_str(),
                        status: status.as_u16(),
                    }
                    .fail();
                }
                let format = IconFormat::from_content_type(
                    response
                        .headers()
                        .get(reqwest::header::CONTENT_TYPE)
                        .and_then(|v| v.to_str().ok()),
                );
                let bytes = response
                    .bytes()
                    .await
                    .context(TransportSnafu { url: url.as_str() })?;
                Ok(IconResource::new(format, bytes.to_vec()))
            })
            .await
        }
        .boxed()
    }
}


#[cfg(test)]
mod tests {
    use super::fake::FakeBackend;
    use super::*;

    #[test]
    fn test_decode_list_response_rejects_other_envelopes() {
        let err = decode_list_response(br#"{"read": {"key": "x"}}"#).expect_err("wrong envelope");
        assert!(matches!(err, Error::Protocol { .. }));

        let listing =
            decode_list_response(br#"{"list": {"path": "/", "name": "", "files": []}}"#)
                .expect("list envelope");
        assert_eq!(listing.path, "/");
    }

    #[test]
    fn test_http_backend_base_uri() {
        let backend = HttpBackend::new(BackendConfig {
            port: 9000,
            ..Default::default()
        })
        .expect("client");
        assert_eq!(backend.base_uri(), "http://localhost:9000");
        assert_eq!(backend.endpoint(), "http://localhost:9000/");
    }

    #[test]
    fn test_fake_resolve() {
        assert_eq!(FakeBackend::resolve(&ListRequest::default()), "/");
        assert_eq!(
            FakeBackend::resolve(&ListRequest::child(Some("/a/b".into()), "../")),
            "/a"
        );
        assert_eq!(
            FakeBackend::resolve(&ListRequest::child(Some("/a".into()), "../")),
            "/"
        );
        assert_eq!(
            FakeBackend::resolve(&ListRequest::child(Some("/a".into()), "c/")),
            "/a/c"
        );
    }

    #[test]
    fn test_icon_format_from_content_type() {
        assert_eq!(
            IconFormat::from_content_type(Some("image/svg+xml")),
            IconFormat::Svg
        );
        assert_eq!(IconFormat::from_content_type(Some("image/png")), IconFormat::Png);
        assert_eq!(IconFormat::from_content_type(None), IconFormat::Png);
    }
}
