use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use cosm::{Client, Datapoint, DatapointBatch, Resource};

fn main() -> Result<()> {
    // Example program that calls the library API.
    // Usage: post_datapoints <feed id> <datastream id> <api key>
    let mut args = std::env::args().skip(1);
    let (Some(feed), Some(stream), Some(key)) = (args.next(), args.next(), args.next()) else {
        anyhow::bail!("usage: post_datapoints <feed id> <datastream id> <api key>");
    };

    let client = Client::new(Resource::datastream(&feed, &stream)?, Some(key))?.with_progress(true);

    // Five samples, five minutes apart, ending now.
    let now = Utc::now();
    let batch: DatapointBatch = [30, 35, 40, 35, 30]
        .iter()
        .enumerate()
        .map(|(i, v)| Datapoint::at_time(now - Duration::minutes(5 * (4 - i as i64)), v.to_string()))
        .collect();

    let resp = client.post_batch(&batch).context("failed to post datapoints")?;
    println!("posted {} datapoint(s): HTTP {}", batch.len(), resp.status());

    let state = client.get_as_map()?;
    println!("current value: {}", state.get("current_value").cloned().unwrap_or_default());
    Ok(())
}
