//! `cosm-feed`: print the current state of a Cosm feed or datastream.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use cosm::{ApiScheme, Client, ClientConfig, Resource};
use std::process::ExitCode;
use tracing::debug;

/// Query the Cosm API for the current state of the specified feed.
#[derive(Parser, Debug)]
#[command(name = "cosm-feed", version, about, long_about = None)]
struct Args {
    /// The datastream ID to query the state of (the feed ID unless --feed is given)
    #[arg(short = 's', long = "streamid", value_name = "DATASTREAM ID", value_parser = non_blank)]
    stream_id: String,

    /// The Cosm API key to use when accessing the service
    #[arg(short = 'k', long = "apikey", value_name = "API KEY", value_parser = non_blank)]
    api_key: String,

    /// Feed containing the datastream; selects /feeds/{feed}/datastreams/{stream} addressing
    #[arg(short = 'f', long, value_name = "FEED ID", value_parser = non_blank)]
    feed: Option<String>,

    /// Use the legacy Pachube endpoint (HTTP, X-PachubeApiKey)
    #[arg(long)]
    legacy: bool,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Accepted for compatibility; has no effect
    #[arg(short = 'o', long, hide = true)]
    output: Option<String>,
}

fn non_blank(s: &str) -> std::result::Result<String, String> {
    let v = s.trim();
    if v.is_empty() {
        Err("must not be empty".to_string())
    } else {
        Ok(v.to_string())
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        tracing_subscriber::EnvFilter::new(format!("warn,cosm={level},cosm_feed={level}"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            let code = exit_code(&e);
            if code == USAGE_EXIT_CODE {
                eprintln!("\t for help use --help");
            }
            ExitCode::from(code)
        }
    }
}

/// Same status clap uses for argument errors.
const USAGE_EXIT_CODE: u8 = 2;

/// Bad identifiers or keys are usage errors; anything else is a failed request.
fn exit_code(e: &anyhow::Error) -> u8 {
    match e.downcast_ref::<cosm::Error>() {
        Some(cosm::Error::Configuration { .. }) => USAGE_EXIT_CODE,
        _ => 1,
    }
}

fn run(args: &Args) -> Result<()> {
    if let Some(output) = &args.output {
        debug!(output = %output, "--output is ignored");
    }

    let resource = match &args.feed {
        Some(feed) => Resource::datastream(feed, &args.stream_id)?,
        None => Resource::feed(&args.stream_id)?,
    };

    let scheme = if args.legacy {
        ApiScheme::Pachube
    } else {
        ApiScheme::Cosm
    };
    let config = ClientConfig::new(scheme).with_api_key(args.api_key.clone());
    let client = Client::with_config(resource, config)?.with_progress(args.verbose == 0);

    let state = client
        .get_as_map()
        .with_context(|| format!("failed to query {}", client.resource()))?;

    println!();
    if let Some(feed) = &args.feed {
        println!("feed ID: {}", feed);
    }
    println!("datastream ID: {}", args.stream_id);
    println!("state: {}", serde_json::to_string_pretty(&state)?);
    println!();
    Ok(())
}
