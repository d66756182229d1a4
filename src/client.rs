//! HTTP transport for the YNO management API.
//!
//! `YnoClient` owns a shared [`ClientConfig`] and exposes JSON request
//! helpers (`get`, `post`, `put`, `delete`) on top of a single core method,
//! [`YnoClient::execute`].
//!
//! Per-call overrides:
//! - A call without options borrows the shared config directly.
//! - A call with options clones the config, applies the options to the
//!   clone and sends with it. The shared config is never mutated, so one
//!   `YnoClient` can serve concurrent calls with different overrides.
//!
//! There is no retry anywhere in this module. A failed call returns
//! immediately; retry policy belongs to the caller.

use bytes::Bytes;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use std::borrow::Cow;
use std::collections::BTreeMap;
use tracing::debug;
use url::Url;

use crate::auth::ApiKey;
use crate::error::{Result, YnoError};
use crate::option::{ClientConfig, ClientOption};

/// Everything except RFC 3986 unreserved characters is encoded, so a path
/// parameter can never add segments, a query or a fragment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Production endpoint of the YNO management API.
pub const YNO_BASE_URL: &str = "https://yno-mngapi.netvolante.jp";

/// Client for the YNO REST API.
///
/// Construct once and share; every method takes `&self`.
#[derive(Debug, Clone)]
pub struct YnoClient {
    config: ClientConfig,
}

impl YnoClient {
    /// Creates a client for `base_url`, applying `options` in order over the
    /// defaults (30 second timeout, no headers).
    ///
    /// # Errors
    ///
    /// - `YnoError::InvalidBaseUrl` if `base_url` is not an absolute URL.
    /// - `YnoError::Network` if the default transport cannot be built.
    pub fn new(base_url: &str, options: &[ClientOption]) -> Result<Self> {
        let mut config = ClientConfig::new(base_url)?;
        config.apply(options);
        Ok(YnoClient { config })
    }

    /// Creates a client that authenticates every request with `api_key`.
    ///
    /// The credential headers are applied before `options`, so an explicit
    /// header option can still replace them.
    pub fn with_api_key(base_url: &str, api_key: &ApiKey, options: &[ClientOption]) -> Result<Self> {
        let mut config = ClientConfig::new(base_url)?;
        config.apply(&api_key.header_options()?);
        config.apply(options);
        Ok(YnoClient { config })
    }

    /// The shared configuration. Per-call options never change it.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the shared config, or a private copy with `options` applied.
    fn effective_config(&self, options: &[ClientOption]) -> Cow<'_, ClientConfig> {
        if options.is_empty() {
            return Cow::Borrowed(&self.config);
        }

        let mut copy = self.config.clone();
        copy.apply(options);
        Cow::Owned(copy)
    }

    /// Resolves `path` against the base URL.
    ///
    /// Uses RFC 3986 reference resolution: `routers/_search` is joined onto
    /// the base path, `/routers` replaces it, and an absolute URL is used
    /// as-is.
    fn resolve(&self, path: &str) -> Result<Url> {
        self.config
            .base_url
            .join(path)
            .map_err(|source| YnoError::InvalidPath {
                path: path.to_string(),
                source,
            })
    }

    /// Core request method: sends `body` as JSON (if any) and returns the
    /// raw body of a 2xx response.
    ///
    /// # Errors
    ///
    /// - `YnoError::InvalidPath` — `path` cannot be resolved.
    /// - `YnoError::Serialize` — `body` cannot be encoded.
    /// - `YnoError::Network` — transport failure or timeout.
    /// - `YnoError::Api` — non-2xx status; carries the body text.
    pub async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        options: &[ClientOption],
    ) -> Result<Bytes> {
        let url = self.resolve(path)?;
        self.send_to(method, url, body, options).await
    }

    /// Like [`send`](Self::send), then decodes the JSON body into `T`.
    ///
    /// A body that does not match `T` is `YnoError::Decode`, never `Api`.
    pub async fn execute<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        options: &[ClientOption],
    ) -> Result<T> {
        let bytes = self.send(method, path, body, options).await?;
        decode(&bytes)
    }

    async fn send_to<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
        options: &[ClientOption],
    ) -> Result<Bytes> {
        let config = self.effective_config(options);

        // Encoded up front so a serialization failure is reported as such
        // instead of surfacing as a reqwest builder error.
        let payload = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(YnoError::Serialize)?;

        debug!(%method, %url, "sending YNO API request");

        let mut request = config
            .http
            .request(method, url)
            .headers(config.headers.clone())
            .timeout(config.timeout);
        if let Some(payload) = payload {
            request = request.body(payload);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            // A failed read degrades to an empty body.
            let body = match response.text().await {
                Ok(body) => body,
                Err(err) => {
                    debug!(error = %err, "failed to read YNO API error body");
                    String::new()
                }
            };
            debug!(status = status.as_u16(), "YNO API request failed");
            return Err(api_error(status, body));
        }

        Ok(response.bytes().await?)
    }

    /// Sends a GET request and decodes the JSON response.
    ///
    /// `query` is merged into any query string already present in `path`:
    /// a supplied key replaces every existing value for that key. The final
    /// query string is encoded in key order.
    pub async fn get<T, K, V>(
        &self,
        path: &str,
        query: &[(K, V)],
        options: &[ClientOption],
    ) -> Result<T>
    where
        T: DeserializeOwned,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut url = self.resolve(path)?;
        merge_query(&mut url, query);
        let bytes = self.send_to::<()>(Method::GET, url, None, options).await?;
        decode(&bytes)
    }

    /// Sends a POST request with a JSON body and decodes the JSON response.
    ///
    /// `Content-Type: application/json` is applied after `options`, so it
    /// wins over any caller-supplied value.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        options: &[ClientOption],
    ) -> Result<T> {
        let options = with_json_content_type(options);
        self.execute(Method::POST, path, Some(body), &options).await
    }

    /// Sends a PUT request with a JSON body and decodes the JSON response.
    ///
    /// Content type handling is the same as [`post`](Self::post).
    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        options: &[ClientOption],
    ) -> Result<T> {
        let options = with_json_content_type(options);
        self.execute(Method::PUT, path, Some(body), &options).await
    }

    /// Sends a DELETE request and decodes the JSON response.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str, options: &[ClientOption]) -> Result<T> {
        self.execute::<(), T>(Method::DELETE, path, None, options).await
    }
}

/// Appends `segment` to `prefix` as one percent-encoded path segment.
pub(crate) fn segment_path(prefix: &str, segment: &str) -> String {
    format!("{prefix}/{}", utf8_percent_encode(segment, PATH_SEGMENT))
}

/// Decodes a 2xx body. An empty body (e.g. `204 No Content`) reads as JSON
/// `null`, so `()` and `Option<_>` targets accept it.
fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let bytes = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"null".as_slice()
    } else {
        bytes
    };
    serde_json::from_slice(bytes).map_err(YnoError::Decode)
}

fn api_error(status: StatusCode, body: String) -> YnoError {
    YnoError::Api {
        status,
        message: format!("request failed with status code {}", status.as_u16()),
        body,
    }
}

/// Caller options followed by a JSON content type header.
fn with_json_content_type(options: &[ClientOption]) -> Vec<ClientOption> {
    let mut merged = options.to_vec();
    merged.push(ClientOption::Header(
        CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    ));
    merged
}

/// Overlays `overrides` on the query string of `url`.
fn merge_query<K: AsRef<str>, V: AsRef<str>>(url: &mut Url, overrides: &[(K, V)]) {
    if overrides.is_empty() {
        return;
    }

    let mut pairs: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, value) in url.query_pairs() {
        pairs
            .entry(key.into_owned())
            .or_default()
            .push(value.into_owned());
    }
    for (key, value) in overrides {
        pairs.insert(key.as_ref().to_string(), vec![value.as_ref().to_string()]);
    }

    let mut serializer = url.query_pairs_mut();
    serializer.clear();
    for (key, values) in &pairs {
        for value in values {
            serializer.append_pair(key, value);
        }
    }
}
