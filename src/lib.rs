//! A small Rust client for the Cosm (formerly Pachube) feed/datastream API.
//!
//! A [`Client`] is bound to one [`Resource`], either a whole feed
//! (`/v2/feeds/{id}`) or a single datastream
//! (`/v2/feeds/{feed}/datastreams/{stream}`). It can fetch the current state,
//! replace it, and append datapoints. Requests are blocking and never retried.
//!
//! ## Quick start
//!
//! ```no_run
//! use cosm::{Client, Resource};
//!
//! fn main() -> cosm::Result<()> {
//!     let stream = Resource::datastream("59484", "unittest")?;
//!     let client = Client::new(stream, Some("YOUR_API_KEY".to_string()))?;
//!
//!     let state = client.get_as_map()?;
//!     println!("current value: {}", state["current_value"]);
//!
//!     client.post_datapoints([("2013-01-14T12:00:00Z", "30")])?;
//!     Ok(())
//! }
//! ```
//!
//! The legacy Pachube endpoint (plain HTTP, `X-PachubeApiKey`) is selected with
//! [`ApiScheme::Pachube`] through [`ClientConfig`].

#![forbid(unsafe_code)]

mod client;
mod config;
mod datapoint;
mod error;
mod resource;
mod util;

pub use client::Client;
pub use config::{ApiScheme, ClientConfig};
pub use datapoint::{Datapoint, DatapointBatch};
pub use error::{Error, Result};
pub use resource::Resource;
