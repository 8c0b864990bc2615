//! Operator-facing trim run: the same plan/execute steps as
//! [`BatchDeleter::preserve`], with a status line after each of them.

use std::io::Write;

use super::controller::BatchDeleter;
use super::crud::RecordStore;
use super::error::DeleterError;
use super::model::DeletionReport;

pub async fn trim<S, O>(store: &S, preserve_count: u64, out: &mut O) -> Result<DeletionReport, DeleterError>
where
    S: RecordStore + ?Sized,
    O: Write,
{
    let deleter = BatchDeleter::new(store);

    let plan = deleter.plan(preserve_count).await?;
    writeln!(out, "[Info] The collection has {} documents in total.", plan.total_count())?;
    writeln!(out, "[Info] {} documents will be deleted.\n", plan.delete_count())?;

    let mut write_error = None;
    let report = deleter
        .execute(&plan, |progress| {
            if write_error.is_some() {
                return;
            }
            if let Err(e) = writeln!(
                out,
                "[Info] {} documents deleted on this batch. {} documents deleted.",
                progress.deleted_in_batch, progress.deleted_total
            ) {
                write_error = Some(e);
            }
        })
        .await?;

    if let Some(e) = write_error {
        return Err(e.into());
    }

    writeln!(out, "\n[Success] {} documents preserved.", report.preserved_count())?;
    Ok(report)
}
