use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by [`Client`](crate::Client) operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A required identifier, key or base URL is missing or malformed.
    /// Raised before any request is issued.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// The request could not be completed by the HTTP stack.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body is not a JSON object.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// A request body could not be serialized to JSON.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// The API answered with a non-success status.
    #[error("{message}")]
    Api {
        status: u16,
        url: String,
        message: String,
    },
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// HTTP status carried by an [`Error::Api`], if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

// Cosm error bodies look like {"title":"Unauthorized","errors":"You do not have permission ..."}
#[derive(Debug, Default, serde::Deserialize)]
pub(crate) struct CosmErrorResponse {
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) errors: Option<serde_json::Value>,
}

impl CosmErrorResponse {
    fn errors_text(&self) -> String {
        match &self.errors {
            None | Some(serde_json::Value::Null) => String::new(),
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

pub(crate) fn format_cosm_error(status: StatusCode, url: &str, body: &str) -> Error {
    let parsed = serde_json::from_str::<CosmErrorResponse>(body).unwrap_or_default();
    let title = parsed.title.as_deref().unwrap_or("");
    let errors = parsed.errors_text();
    // Non-JSON bodies still carry something worth showing.
    let detail = if parsed.title.is_none() && parsed.errors.is_none() {
        body.trim().to_string()
    } else {
        errors
    };

    let message = if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        format!(
            "Cosm authentication/authorization failed (HTTP {}).\n- Check that an API key was supplied and is still active\n- The key needs read permission for GET and update/create permission for PUT/POST\n\nServer message: {}\n{}\nrequest: {}",
            status.as_u16(),
            title,
            detail,
            url
        )
    } else if status == StatusCode::NOT_FOUND {
        format!(
            "Cosm resource not found (HTTP 404).\n- Check the feed and datastream identifiers\n\nServer message: {}\n{}\nrequest: {}",
            title, detail, url
        )
    } else {
        format!(
            "API request failed: HTTP {} for url ({})\n{}\n{}",
            status.as_u16(),
            url,
            title,
            detail
        )
    };

    Error::Api {
        status: status.as_u16(),
        url: url.to_string(),
        message,
    }
}
