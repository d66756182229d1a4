//! API key authentication for the YNO management API.
//!
//! The API authenticates with static request headers rather than a token
//! exchange: the key goes in `X-Yamaha-YNO-MngAPI-Key` and an optional API
//! version string in `X-Yamaha-YNO-MngAPI-Version`. [`ApiKey`] turns a
//! credential into the header options applied once at client construction.

use crate::error::Result;
use crate::option::ClientOption;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-Yamaha-YNO-MngAPI-Key";

/// Header carrying the API version. Only sent when a version is set.
pub const API_VERSION_HEADER: &str = "X-Yamaha-YNO-MngAPI-Version";

/// Credential for the YNO management API.
///
/// `Debug` redacts the key so it does not leak into logs.
#[derive(Clone)]
pub struct ApiKey {
    key: String,
    version: String,
}

impl ApiKey {
    /// A key without an explicit API version.
    pub fn new(key: &str) -> Self {
        ApiKey {
            key: key.to_string(),
            version: String::new(),
        }
    }

    /// Sets the API version. An empty string means "no version header".
    pub fn with_version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    /// The configured API version, if any.
    pub fn version(&self) -> Option<&str> {
        (!self.version.is_empty()).then_some(self.version.as_str())
    }

    /// Header options for this credential, key first.
    ///
    /// # Errors
    ///
    /// `YnoError::InvalidHeader` if the key or version contains characters
    /// that are not allowed in a header value.
    pub fn header_options(&self) -> Result<Vec<ClientOption>> {
        let mut options = vec![ClientOption::header(API_KEY_HEADER, &self.key)?];
        if let Some(version) = self.version() {
            options.push(ClientOption::header(API_VERSION_HEADER, version)?);
        }
        Ok(options)
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKey")
            .field("key", &"<redacted>")
            .field("version", &self.version)
            .finish()
    }
}
