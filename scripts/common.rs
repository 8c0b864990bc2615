use mongo_utilities::config::database;
use mongo_utilities::config::prompt::{conclude, Prompter};
use mongo_utilities::modules::aggregator::controller::AggregationStep;
use mongo_utilities::modules::aggregator::crud::AggregatorCrud;
use mongo_utilities::modules::aggregator::error::AggregatorError;
use mongo_utilities::modules::aggregator::pipeline::RandomStationSynthesizer;
use mongo_utilities::modules::aggregator::schema::{AggregatorConfig, Preset};
use mongo_utilities::StationAggregator;
use std::io::{BufRead, Write};
use validator::Validate;

/// Prompt, connect, aggregate, disconnect. Only validation failures are
/// reported here; everything else ends the process with the error.
pub async fn run_preset<R: BufRead, W: Write, O: Write>(
    preset: Preset,
    prompter: &mut Prompter<R, W>,
    out: &mut O,
) -> anyhow::Result<u8> {
    let result = run(preset, prompter, out).await;
    Ok(conclude(result, out)?)
}

async fn run<R: BufRead, W: Write, O: Write>(
    preset: Preset,
    prompter: &mut Prompter<R, W>,
    out: &mut O,
) -> Result<(), AggregatorError> {
    let config = AggregatorConfig::prompt(preset, prompter)?;
    config.validate()?;

    let client = database::connect(&config.connection_string).await?;
    let crud = AggregatorCrud::new(
        &client.database(&config.db_name),
        &config.collection_name,
        &client.database(&config.new_db_name),
        &config.new_collection_name,
    );

    let synthesizer = RandomStationSynthesizer::default();
    let mut write_error = None;
    StationAggregator::new(&crud, &synthesizer)
        .run(config.create_index, |step| {
            let written = match step {
                AggregationStep::DevicesCounted(devices) => writeln!(out, "{} devices found.", devices),
                AggregationStep::Merged { collection } => {
                    writeln!(out, "Data inserted in {} collection.", collection)
                }
                AggregationStep::IndexCreated(_) => writeln!(out, "Index created."),
            };
            if let Err(e) = written {
                write_error.get_or_insert(e);
            }
        })
        .await?;

    client.shutdown().await;

    match write_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
