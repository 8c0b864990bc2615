use super::crud::AggregatorCrud;
use super::error::AggregatorError;
use super::pipeline::FieldSynthesizer;

/// Milestones reported while a run progresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregationStep {
    DevicesCounted(u64),
    Merged { collection: String },
    IndexCreated(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationReport {
    pub devices: u64,
    pub index_name: Option<String>,
}

/// Count, flatten-and-merge, then optionally index the target.
pub struct StationAggregator<'a> {
    crud: &'a AggregatorCrud,
    synthesizer: &'a dyn FieldSynthesizer,
}

impl<'a> StationAggregator<'a> {
    pub fn new(crud: &'a AggregatorCrud, synthesizer: &'a dyn FieldSynthesizer) -> Self {
        Self { crud, synthesizer }
    }

    pub async fn run<F>(
        &self,
        create_index: bool,
        mut on_step: F,
    ) -> Result<AggregationReport, AggregatorError>
    where
        F: FnMut(&AggregationStep),
    {
        let devices = self.crud.count_devices().await?;
        tracing::info!(devices, "devices counted");
        on_step(&AggregationStep::DevicesCounted(devices));

        self.crud.aggregate_and_merge(self.synthesizer).await?;
        let collection = self.crud.target_collection();
        tracing::info!(target = %collection, "stations merged");
        on_step(&AggregationStep::Merged { collection });

        let index_name = if create_index {
            let name = self.crud.create_index().await?;
            tracing::info!(index = %name, "index ensured");
            on_step(&AggregationStep::IndexCreated(name.clone()));
            Some(name)
        } else {
            None
        };

        Ok(AggregationReport { devices, index_name })
    }
}
