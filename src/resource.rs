use std::fmt;

use crate::error::{Error, Result};
use crate::util::non_empty;

/// Address of a Cosm resource.
///
/// The API exposes feeds both as a whole (`/v2/feeds/{id}`) and per datastream
/// (`/v2/feeds/{feed}/datastreams/{stream}`). Both forms are supported; the caller
/// picks one explicitly. Identifiers are validated on construction, so a
/// `Resource` always names something requestable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    /// One-level addressing: `/v2/feeds/{id}`.
    Feed { id: String },
    /// Two-level addressing: `/v2/feeds/{feed_id}/datastreams/{datastream_id}`.
    Datastream {
        feed_id: String,
        datastream_id: String,
    },
}

impl Resource {
    pub fn feed(id: impl AsRef<str>) -> Result<Self> {
        Ok(Self::Feed {
            id: validate_id("feed id", id.as_ref())?,
        })
    }

    pub fn datastream(feed_id: impl AsRef<str>, datastream_id: impl AsRef<str>) -> Result<Self> {
        Ok(Self::Datastream {
            feed_id: validate_id("feed id", feed_id.as_ref())?,
            datastream_id: validate_id("datastream id", datastream_id.as_ref())?,
        })
    }

    /// The id the API reports back as `id` when the resource is fetched.
    pub fn id(&self) -> &str {
        match self {
            Self::Feed { id } => id,
            Self::Datastream { datastream_id, .. } => datastream_id,
        }
    }

    pub fn feed_id(&self) -> &str {
        match self {
            Self::Feed { id } => id,
            Self::Datastream { feed_id, .. } => feed_id,
        }
    }

    pub(crate) fn path(&self) -> String {
        match self {
            Self::Feed { id } => format!("/v2/feeds/{}", id),
            Self::Datastream {
                feed_id,
                datastream_id,
            } => format!("/v2/feeds/{}/datastreams/{}", feed_id, datastream_id),
        }
    }

    pub(crate) fn datapoints_path(&self) -> Result<String> {
        match self {
            Self::Datastream { .. } => Ok(format!("{}/datapoints", self.path())),
            Self::Feed { id } => Err(Error::config(format!(
                "datapoints belong to a datastream; feed {} was addressed without a datastream id",
                id
            ))),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Feed { id } => write!(f, "feed {}", id),
            Self::Datastream {
                feed_id,
                datastream_id,
            } => write!(f, "feed {} datastream {}", feed_id, datastream_id),
        }
    }
}

fn validate_id(what: &str, raw: &str) -> Result<String> {
    let Some(id) = non_empty(raw) else {
        return Err(Error::config(format!("missing {}", what)));
    };
    // URL parsing resolves dot segments, which would address a parent resource.
    if id == "." || id == ".." {
        return Err(Error::config(format!(
            "invalid {} {:?}: dot segments are not identifiers",
            what, id
        )));
    }
    // `\` counts as a separator and `%` could spell an encoded dot segment.
    if let Some(bad) = id.chars().find(|c| {
        matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_whitespace() || c.is_control()
    }) {
        return Err(Error::config(format!(
            "invalid {} {:?}: must not contain {:?}",
            what, id, bad
        )));
    }
    Ok(id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn feed_path() {
        let r = Resource::feed("3194").unwrap();
        assert_eq!(r.path(), "/v2/feeds/3194");
        assert_eq!(r.id(), "3194");
        assert_eq!(r.feed_id(), "3194");
    }

    #[test]
    fn datastream_paths() {
        let r = Resource::datastream("59484", "unittest").unwrap();
        assert_eq!(r.path(), "/v2/feeds/59484/datastreams/unittest");
        assert_eq!(
            r.datapoints_path().unwrap(),
            "/v2/feeds/59484/datastreams/unittest/datapoints"
        );
        assert_eq!(r.id(), "unittest");
        assert_eq!(r.to_string(), "feed 59484 datastream unittest");
    }

    #[test]
    fn identifiers_are_trimmed() {
        let r = Resource::datastream(" 59484", "unittest\n").unwrap();
        assert_eq!(r.path(), "/v2/feeds/59484/datastreams/unittest");
    }

    #[test]
    fn feed_has_no_datapoints() {
        let err = Resource::feed("3194").unwrap().datapoints_path().unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test_case("" ; "empty")]
    #[test_case("   " ; "blank")]
    #[test_case("a/b" ; "slash")]
    #[test_case("a?b" ; "query")]
    #[test_case("a#b" ; "fragment")]
    #[test_case("." ; "current dir segment")]
    #[test_case(".." ; "parent dir segment")]
    #[test_case("%2e%2e" ; "encoded parent dir segment")]
    #[test_case("a\\b" ; "backslash")]
    #[test_case("a b" ; "inner space")]
    fn rejects_bad_stream_id(id: &str) {
        let err = Resource::datastream("59484", id).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }), "{err:?}");
    }

    #[test]
    fn dotted_ids_are_allowed() {
        let r = Resource::datastream("59484", "temp.outside").unwrap();
        assert_eq!(r.path(), "/v2/feeds/59484/datastreams/temp.outside");
    }

    #[test]
    fn parent_segment_feed_is_rejected() {
        let err = Resource::feed("..").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn missing_feed_id_is_reported() {
        let err = Resource::datastream("", "unittest").unwrap_err();
        assert_eq!(err.to_string(), "configuration error: missing feed id");
    }
}
