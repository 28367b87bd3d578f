use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Method;
use reqwest::blocking::{Client as HttpClient, RequestBuilder, Response};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::debug;

use crate::config::{ClientConfig, load_config};
use crate::datapoint::DatapointBatch;
use crate::error::{Error, Result, format_cosm_error};
use crate::resource::Resource;
use crate::util::{redact, urljoin};

/// Client bound to one feed or datastream.
///
/// Every call issues exactly one request on a fresh connection. Nothing is
/// retried; transport failures come back as [`Error::Transport`].
#[derive(Debug, Clone)]
pub struct Client {
    resource: Resource,
    base_url: String,
    api_key: Option<(HeaderName, HeaderValue)>,
    progress: bool,

    http: HttpClient,
}

impl Client {
    /// Creates a Cosm client for `resource`, authenticated when `api_key` is set.
    pub fn new(resource: Resource, api_key: Option<String>) -> Result<Self> {
        Self::with_config(
            resource,
            ClientConfig {
                api_key,
                ..ClientConfig::default()
            },
        )
    }

    pub fn with_config(resource: Resource, config: ClientConfig) -> Result<Self> {
        let cfg = load_config(config)?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("cosm-rs/{}", env!("CARGO_PKG_VERSION")))
                .unwrap_or(HeaderValue::from_static("cosm-rs")),
        );
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        // No idle connections are kept, so each request dials anew.
        let http = HttpClient::builder()
            .default_headers(default_headers)
            .pool_max_idle_per_host(0)
            .build()?;

        Ok(Self {
            resource,
            base_url: cfg.base_url,
            api_key: cfg.api_key,
            progress: false,
            http,
        })
    }

    /// Shows a spinner on stderr while a request is in flight.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Full URL of the resource.
    pub fn url(&self) -> String {
        urljoin(&self.base_url, &self.resource.path())
    }

    /// Full URL of the datapoints sub-resource.
    ///
    /// Fails for feed-level resources, which have no datapoints of their own.
    pub fn datapoints_url(&self) -> Result<String> {
        Ok(urljoin(&self.base_url, &self.resource.datapoints_path()?))
    }

    /// Retrieves the current state of the resource.
    ///
    /// The raw response is returned whatever its status; an anonymous request for
    /// a private resource yields a 401 response, not an error.
    pub fn get(&self) -> Result<Response> {
        self.send::<()>(Method::GET, &self.url(), None)
    }

    /// Like [`get`](Self::get), decoding the body as a JSON object.
    pub fn get_as_map(&self) -> Result<Map<String, Value>> {
        let resp = self.get()?;
        let status = resp.status();
        let url = resp.url().to_string();
        let text = resp.text()?;

        if !status.is_success() {
            return Err(format_cosm_error(status, &url, &text));
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// Replaces the state of the resource with `body`.
    pub fn put<T: Serialize + ?Sized>(&self, body: &T) -> Result<Response> {
        self.send(Method::PUT, &self.url(), Some(body))
    }

    /// Sets the datastream's `current_value`.
    pub fn update_current_value(&self, value: impl Into<String>) -> Result<Response> {
        self.put(&serde_json::json!({ "current_value": value.into() }))
    }

    /// Posts `body` to the datapoints sub-resource.
    pub fn post<T: Serialize + ?Sized>(&self, body: &T) -> Result<Response> {
        let url = self.datapoints_url()?;
        self.send(Method::POST, &url, Some(body))
    }

    /// Submits `(timestamp, value)` pairs as new datapoints, in the given order.
    ///
    /// ```no_run
    /// # fn main() -> cosm::Result<()> {
    /// use cosm::{Client, Resource};
    ///
    /// let client = Client::new(Resource::datastream("59484", "unittest")?, Some("KEY".into()))?;
    /// client.post_datapoints([
    ///     ("2013-01-14T12:00:00Z", "30"),
    ///     ("2013-01-14T12:05:00Z", "35"),
    /// ])?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn post_datapoints<I, A, V>(&self, datapoints: I) -> Result<Response>
    where
        I: IntoIterator<Item = (A, V)>,
        A: Into<String>,
        V: Into<String>,
    {
        self.post_batch(&DatapointBatch::from_pairs(datapoints))
    }

    pub fn post_batch(&self, batch: &DatapointBatch) -> Result<Response> {
        debug!(count = batch.len(), resource = %self.resource, "posting datapoints");
        self.post(batch)
    }

    /// Deleting resources is not supported. Sends nothing.
    pub fn delete(&self) {
        debug!(resource = %self.resource, "delete is not implemented; no request sent");
    }

    fn apply_auth(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some((name, value)) => req.header(name.clone(), value.clone()),
            None => req,
        }
    }

    fn send<T: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: Option<&T>,
    ) -> Result<Response> {
        let mut req = self.apply_auth(self.http.request(method.clone(), url));
        if let Some(body) = body {
            let bytes = serde_json::to_vec(body).map_err(Error::Encode)?;
            req = req.header(CONTENT_TYPE, "application/json").body(bytes);
        }

        let key_hint = self
            .api_key
            .as_ref()
            .and_then(|(_, v)| v.to_str().ok())
            .map(redact)
            .unwrap_or_else(|| "(anonymous)".to_string());
        debug!(%method, url, api_key = %key_hint, "sending request");

        let spinner = self.spinner(&method, url);
        let result = req.send();
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        let resp = result?;
        debug!(%method, url, status = resp.status().as_u16(), "received response");
        Ok(resp)
    }

    fn spinner(&self, method: &Method, url: &str) -> Option<ProgressBar> {
        if !self.progress {
            return None;
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("{} {}", method, url));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiScheme;
    use pretty_assertions::assert_eq;

    #[test]
    fn urls_follow_scheme() {
        let cosm = Client::new(Resource::datastream("59484", "unittest").unwrap(), None).unwrap();
        assert_eq!(cosm.url(), "https://api.cosm.com/v2/feeds/59484/datastreams/unittest");
        assert_eq!(
            cosm.datapoints_url().unwrap(),
            "https://api.cosm.com/v2/feeds/59484/datastreams/unittest/datapoints"
        );

        let pachube = Client::with_config(
            Resource::feed("3194").unwrap(),
            ClientConfig::new(ApiScheme::Pachube),
        )
        .unwrap();
        assert_eq!(pachube.url(), "http://api.pachube.com/v2/feeds/3194");
        assert!(matches!(
            pachube.datapoints_url(),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn unserializable_body_is_encode_error() {
        use std::collections::HashMap;

        // JSON object keys must be strings; the request is never sent.
        let client = Client::with_config(
            Resource::datastream("59484", "unittest").unwrap(),
            ClientConfig::default().with_base_url("http://127.0.0.1:9"),
        )
        .unwrap();
        let body: HashMap<(i32, i32), &str> = HashMap::from([((1, 2), "30")]);
        assert!(matches!(client.put(&body), Err(Error::Encode(_))));
        assert!(matches!(client.post(&body), Err(Error::Encode(_))));
    }

    #[test]
    fn blank_key_is_rejected_before_any_request() {
        let err = Client::new(Resource::feed("3194").unwrap(), Some(" ".into())).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }
}
