//! Run with: cargo run --bin delete_surplus
//!
//! Trims a collection down to a given number of documents.

use mongo_utilities::config::prompt::{conclude, Prompter};
use mongo_utilities::config::{database, logging};
use mongo_utilities::modules::deleter::crud::DeleterCrud;
use mongo_utilities::modules::deleter::error::DeleterError;
use mongo_utilities::modules::deleter::schema::DeleterConfig;
use mongo_utilities::modules::deleter::session;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use validator::Validate;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    logging::init();

    let mut stdout = io::stdout();
    let result = run(&mut Prompter::stdio(), &mut stdout).await;
    Ok(ExitCode::from(conclude(result, &mut stdout)?))
}

async fn run<R: BufRead, W: Write, O: Write>(
    prompter: &mut Prompter<R, W>,
    out: &mut O,
) -> Result<(), DeleterError> {
    let config = DeleterConfig::prompt(prompter)?;
    config.validate()?;

    writeln!(out, "\n[Info] Connecting to '{}'...", config.connection_string)?;
    let client = database::connect(&config.connection_string).await?;
    let db = client.database(&config.db_name);
    let crud = DeleterCrud::new(&db, &config.collection_name);
    writeln!(out, "[Success] Connected to the database.\n")?;

    session::trim(&crud, config.preserve_count, out).await?;

    client.shutdown().await;
    writeln!(out, "[Info] Connection to the database closed.")?;
    Ok(())
}
