use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::error::{Error, Result};

/// A single timestamped sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Datapoint {
    /// ISO 8601 timestamp, e.g. `2013-01-14T12:00:00Z`.
    pub at: String,
    pub value: String,
}

impl Datapoint {
    pub fn new(at: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            at: at.into(),
            value: value.into(),
        }
    }

    pub fn at_time(at: DateTime<Utc>, value: impl Into<String>) -> Self {
        Self::new(at.to_rfc3339_opts(SecondsFormat::Secs, true), value)
    }
}

/// Body of a datapoints POST: `{"datapoints":[{"at":..,"value":..},..]}`.
///
/// Order is preserved as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatapointBatch {
    pub datapoints: Vec<Datapoint>,
}

impl DatapointBatch {
    pub fn from_pairs<I, A, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, V)>,
        A: Into<String>,
        V: Into<String>,
    {
        pairs.into_iter().collect()
    }

    pub fn push(&mut self, datapoint: Datapoint) {
        self.datapoints.push(datapoint);
    }

    pub fn len(&self) -> usize {
        self.datapoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datapoints.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Error::Encode)
    }
}

impl<A, V> FromIterator<(A, V)> for DatapointBatch
where
    A: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (A, V)>>(iter: T) -> Self {
        Self {
            datapoints: iter
                .into_iter()
                .map(|(at, value)| Datapoint::new(at, value))
                .collect(),
        }
    }
}

impl FromIterator<Datapoint> for DatapointBatch {
    fn from_iter<T: IntoIterator<Item = Datapoint>>(iter: T) -> Self {
        Self {
            datapoints: iter.into_iter().collect(),
        }
    }
}
