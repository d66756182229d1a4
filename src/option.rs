//! Client configuration and composable overrides.
//!
//! [`ClientConfig`] is the aggregate every request reads: base URL, default
//! headers, HTTP transport and timeout. [`ClientOption`] values mutate a
//! config in place and are applied in order, so a later option touching the
//! same field wins.
//!
//! Options are used twice: once at construction to shape the shared config,
//! and per call, where they are applied to a private clone (see
//! `YnoClient::execute`).

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;
use url::Url;

use crate::error::{Result, YnoError};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connect timeout for the default transport. Covers TCP + TLS only.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds the default `reqwest::Client`.
///
/// The overall timeout is not set here; it lives in [`ClientConfig`] and is
/// applied per request so that overrides do not need a new transport.
fn build_http_client() -> Result<Client> {
    Ok(Client::builder().connect_timeout(CONNECT_TIMEOUT).build()?)
}

/// Connection settings shared by every call on a `YnoClient`.
///
/// Cloning is cheap: `reqwest::Client` is reference counted, so a clone
/// shares the connection pool, redirect policy and cookie settings of the
/// original while getting its own header map and timeout.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub(crate) http: Client,
    pub(crate) base_url: Url,
    pub(crate) headers: HeaderMap,
    pub(crate) timeout: Duration,
}

impl ClientConfig {
    /// Parses `base_url` and builds a config with the default transport,
    /// an empty header set and a 30 second timeout.
    ///
    /// The URL must be absolute and able to act as a base for relative
    /// references.
    pub fn new(base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url).map_err(|source| YnoError::InvalidBaseUrl {
            url: base_url.to_string(),
            source: Some(source),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(YnoError::InvalidBaseUrl {
                url: base_url.to_string(),
                source: None,
            });
        }

        Ok(ClientConfig {
            http: build_http_client()?,
            base_url: parsed,
            headers: HeaderMap::new(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Applies `options` in order.
    pub fn apply<'a>(&mut self, options: impl IntoIterator<Item = &'a ClientOption>) {
        for option in options {
            option.apply(self);
        }
    }

    /// The base URL every request path is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Headers sent with every request.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// A single configuration override.
#[derive(Debug, Clone)]
pub enum ClientOption {
    /// Sets a header, replacing any existing value for the same name.
    Header(HeaderName, HeaderValue),
    /// Sets the request timeout.
    Timeout(Duration),
    /// Substitutes the underlying HTTP transport.
    HttpClient(Client),
}

impl ClientOption {
    /// Builds a `Header` option from strings.
    ///
    /// Header names are case-insensitive; `X-Foo` and `x-foo` address the
    /// same entry.
    pub fn header(name: &str, value: &str) -> Result<Self> {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            YnoError::InvalidHeader {
                name: name.to_string(),
                source: Box::new(e),
            }
        })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| YnoError::InvalidHeader {
            name: name.to_string(),
            source: Box::new(e),
        })?;
        Ok(ClientOption::Header(header_name, header_value))
    }

    /// Builds a `Timeout` option.
    pub fn timeout(timeout: Duration) -> Self {
        ClientOption::Timeout(timeout)
    }

    /// Builds an `HttpClient` option.
    pub fn http_client(client: Client) -> Self {
        ClientOption::HttpClient(client)
    }

    /// Mutates `config` in place.
    pub fn apply(&self, config: &mut ClientConfig) {
        match self {
            ClientOption::Header(name, value) => {
                config.headers.insert(name.clone(), value.clone());
            }
            ClientOption::Timeout(timeout) => config.timeout = *timeout,
            ClientOption::HttpClient(client) => config.http = client.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_config_has_defaults() {
        let config = ClientConfig::new("https://yno-mngapi.netvolante.jp").unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.headers().is_empty());
        assert_eq!(config.base_url().as_str(), "https://yno-mngapi.netvolante.jp/");
    }

    #[test]
    fn relative_base_url_is_rejected() {
        let err = ClientConfig::new("routers/_search").unwrap_err();
        assert!(
            matches!(err, YnoError::InvalidBaseUrl { source: Some(_), .. }),
            "expected InvalidBaseUrl, got {err:?}"
        );
    }

    #[test]
    fn non_base_url_is_rejected() {
        let err = ClientConfig::new("mailto:ops@example.com").unwrap_err();
        assert!(
            matches!(err, YnoError::InvalidBaseUrl { source: None, .. }),
            "expected InvalidBaseUrl without a parse source, got {err:?}"
        );
    }

    #[test]
    fn later_header_option_wins() {
        let mut config = ClientConfig::new("https://example.com").unwrap();
        let options = [
            ClientOption::header("X-Test", "1").unwrap(),
            ClientOption::header("x-test", "2").unwrap(),
        ];
        config.apply(&options);
        assert_eq!(config.headers().len(), 1, "names are case-insensitive");
        assert_eq!(config.headers()["X-Test"], "2");
    }

    #[test]
    fn later_timeout_option_wins() {
        let mut config = ClientConfig::new("https://example.com").unwrap();
        config.apply(&[
            ClientOption::timeout(Duration::from_secs(5)),
            ClientOption::timeout(Duration::from_millis(50)),
        ]);
        assert_eq!(config.timeout(), Duration::from_millis(50));
    }

    #[test]
    fn clone_does_not_share_headers() {
        let mut shared = ClientConfig::new("https://example.com").unwrap();
        shared.apply(&[ClientOption::header("X", "1").unwrap()]);

        let mut copy = shared.clone();
        copy.apply(&[
            ClientOption::header("X", "2").unwrap(),
            ClientOption::timeout(Duration::from_secs(1)),
        ]);

        assert_eq!(shared.headers()["X"], "1");
        assert_eq!(shared.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(copy.headers()["X"], "2");
    }

    #[test]
    fn invalid_header_name_is_rejected() {
        let err = ClientOption::header("bad header", "v").unwrap_err();
        assert!(matches!(err, YnoError::InvalidHeader { ref name, .. } if name == "bad header"));
    }

    #[test]
    fn invalid_header_value_is_rejected() {
        let err = ClientOption::header("X-Test", "line\nbreak").unwrap_err();
        assert!(matches!(err, YnoError::InvalidHeader { .. }));
    }
}
