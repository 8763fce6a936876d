//! status_logs - dump the compliance status log as JSON

use anyhow::Result;
use clap::Parser;

use sitewatch::{SqliteStatusSink, StatusSink};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Status log database path.
    #[arg(long, default_value = "helmet_check.db")]
    db: String,
    /// Pretty-print the output.
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let sink = SqliteStatusSink::open(&args.db)?;
    let records = sink.query_all()?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&records)?
    } else {
        serde_json::to_string(&records)?
    };
    println!("{}", json);
    Ok(())
}
