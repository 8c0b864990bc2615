//! Run with: cargo run --bin aggregate_stations
//!
//! Flattens user HGU documents into the stations catalogue and indexes it.

use mongo_utilities::config::{logging, prompt::Prompter};
use mongo_utilities::modules::aggregator::schema::Preset;
use std::io;
use std::process::ExitCode;

mod common;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    logging::init();

    let status = common::run_preset(Preset::StationsCatalogue, &mut Prompter::stdio(), &mut io::stdout()).await?;
    Ok(ExitCode::from(status))
}
