use reqwest::header::{HeaderName, HeaderValue};

use crate::error::{Error, Result};
use crate::util::non_empty;

/// Which flavour of the service to talk to.
///
/// The API was first published as Pachube (plain HTTP, `X-PachubeApiKey`) and
/// later rebranded as Cosm (HTTPS, `X-ApiKey`). Paths are the same `/v2` layout
/// for both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApiScheme {
    #[default]
    Cosm,
    Pachube,
}

impl ApiScheme {
    pub fn base_url(self) -> &'static str {
        match self {
            Self::Cosm => "https://api.cosm.com",
            Self::Pachube => "http://api.pachube.com",
        }
    }

    pub fn api_key_header(self) -> &'static str {
        match self {
            Self::Cosm => "X-ApiKey",
            Self::Pachube => "X-PachubeApiKey",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub scheme: ApiScheme,
    /// Overrides the scheme's host, e.g. to point at a proxy or test server.
    pub base_url: Option<String>,
    /// API key. Requests are anonymous when unset.
    pub api_key: Option<String>,
}

impl ClientConfig {
    pub fn new(scheme: ApiScheme) -> Self {
        Self {
            scheme,
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

/// A [`ClientConfig`] after validation, ready to put on the wire.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedConfig {
    pub(crate) base_url: String,
    pub(crate) api_key: Option<(HeaderName, HeaderValue)>,
}

pub(crate) fn load_config(cfg: ClientConfig) -> Result<ResolvedConfig> {
    let base_url = match cfg.base_url.as_deref() {
        Some(raw) => {
            let url = non_empty(raw)
                .ok_or_else(|| Error::config("Missing configuration: base url is empty"))?;
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::config(format!(
                    "Invalid base url {:?}: expected an http:// or https:// URL",
                    url
                )));
            }
            url.trim_end_matches('/').to_string()
        }
        None => cfg.scheme.base_url().to_string(),
    };

    let api_key = match cfg.api_key.as_deref() {
        None => None,
        Some(raw) => {
            let key = non_empty(raw)
                .ok_or_else(|| Error::config("Missing configuration: api key is empty"))?;
            let mut value = HeaderValue::from_str(key).map_err(|_| {
                Error::config("Invalid api key: contains characters not allowed in a header")
            })?;
            value.set_sensitive(true);
            let name = HeaderName::from_bytes(cfg.scheme.api_key_header().as_bytes())
                .map_err(|_| Error::config("Invalid api key header name"))?;
            Some((name, value))
        }
    };

    Ok(ResolvedConfig { base_url, api_key })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(ApiScheme::Cosm, "https://api.cosm.com", "x-apikey")]
    #[test_case(ApiScheme::Pachube, "http://api.pachube.com", "x-pachubeapikey")]
    fn scheme_defaults(scheme: ApiScheme, url: &str, header: &str) {
        let resolved = load_config(ClientConfig::new(scheme).with_api_key("secret")).unwrap();
        assert_eq!(resolved.base_url, url);
        let (name, value) = resolved.api_key.unwrap();
        assert_eq!(name.as_str(), header);
        assert_eq!(name.as_str(), scheme.api_key_header().to_ascii_lowercase());
        assert_eq!(value.to_str().unwrap(), "secret");
        assert!(value.is_sensitive());
    }

    #[test]
    fn base_url_override_drops_trailing_slash() {
        let resolved =
            load_config(ClientConfig::default().with_base_url("http://127.0.0.1:8080/")).unwrap();
        assert_eq!(resolved.base_url, "http://127.0.0.1:8080");
        assert!(resolved.api_key.is_none());
    }

    #[test]
    fn key_is_trimmed() {
        let resolved = load_config(ClientConfig::default().with_api_key("  abc \n")).unwrap();
        assert_eq!(resolved.api_key.unwrap().1.to_str().unwrap(), "abc");
    }

    #[test_case(ClientConfig::default().with_api_key("  ") ; "blank key")]
    #[test_case(ClientConfig::default().with_api_key("a\u{7f}b") ; "control char in key")]
    #[test_case(ClientConfig::default().with_base_url("") ; "empty base url")]
    #[test_case(ClientConfig::default().with_base_url("ftp://api.cosm.com") ; "unsupported scheme")]
    fn invalid_configuration(cfg: ClientConfig) {
        let err = load_config(cfg).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }), "{err:?}");
    }
}
