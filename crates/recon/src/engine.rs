use crate::channel::{apply_channel_override, count_overridden};
use crate::classify::{annotate_code, classify};
use crate::config::VerifyConfig;
use crate::error::VerifyError;
use crate::evidence::count_outcomes;
use crate::matcher::join_reference;
use crate::model::{JoinStats, Partitions, RunMeta, RunReport, RunSummary};
use crate::partition::{partition, reunify};
use crate::table::{Table, Value};

/// Name given to the reunified working set.
pub const VERIFICATION_TABLE: &str = "verification";

/// Side effects the pipeline hands off to its caller: exports and the
/// reference source. Each call acquires and releases its resource before
/// returning.
pub trait PipelineStages {
    /// Persist both partitions, before the reference join runs.
    fn export_partitions(&mut self, partitions: &Partitions) -> Result<(), VerifyError>;

    /// Open and fully read the reference catalogue.
    fn load_reference(&mut self) -> Result<Table, VerifyError>;

    /// Persist the final annotated table.
    fn export_report(&mut self, table: &Table) -> Result<(), VerifyError>;
}

/// Result of the verification stages on an already reunified table.
#[derive(Debug, Clone)]
pub struct Verified {
    pub table: Table,
    pub join: JoinStats,
    pub overridden: usize,
}

/// Add the `value` column from `sku`, `corr_sku` and `response`.
pub fn classify_table(table: &Table, config: &VerifyConfig) -> Result<Table, VerifyError> {
    let cols = &config.columns;
    let channels = config.channel_set();
    let index = |column: &str| {
        table.column_index(column).inspect_err(|e| {
            tracing::error!(table = table.name(), "cannot classify: {e}");
        })
    };
    let sku_idx = index(cols.sku.as_str())?;
    let corr_idx = index(cols.corr_sku.as_str())?;
    let response_idx = index(cols.response.as_str())?;

    table.map_column(&cols.value, |row| {
        let outcome = classify(
            row.at(sku_idx),
            row.at(corr_idx),
            row.at(response_idx),
            &channels,
        );
        Value::text(outcome.code())
    })
}

/// Add the `comment` column from `value`.
pub fn annotate_table(table: &Table, config: &VerifyConfig) -> Result<Table, VerifyError> {
    let value_idx = table.column_index(&config.columns.value).inspect_err(|e| {
        tracing::error!(table = table.name(), "cannot annotate: {e}");
    })?;

    table.map_column(&config.columns.comment, |row| {
        Value::text(annotate_code(&row.at(value_idx).to_string()))
    })
}

/// Join, classify, annotate, then apply the channel override.
pub fn verify(
    table: &Table,
    reference: &Table,
    config: &VerifyConfig,
) -> Result<Verified, VerifyError> {
    let joined = join_reference(table, reference, config)?;
    let classified = classify_table(&joined.table, config)?;
    let annotated = annotate_table(&classified, config)?;
    let overridden = count_overridden(&annotated, config)?;
    let table = apply_channel_override(&annotated, config)?;

    tracing::info!(rows = table.len(), overridden, "recognition results checked");

    Ok(Verified {
        table,
        join: joined.stats,
        overridden,
    })
}

/// Run the whole pipeline over a raw input table.
///
/// Stages run in order and the first error aborts the run. Partitions are
/// exported before the reference is loaded, so they survive a later failure;
/// the report is only written once every stage has succeeded.
pub fn run(
    input: &Table,
    stages: &mut dyn PipelineStages,
    config: &VerifyConfig,
) -> Result<RunReport, VerifyError> {
    config.validate()?;

    let partitions = partition(input, &config.columns.partition)?;
    stages.export_partitions(&partitions)?;

    let verification = reunify(&partitions, VERIFICATION_TABLE)?;

    let reference = stages.load_reference()?;
    let verified = verify(&verification, &reference, config)?;

    stages.export_report(&verified.table)?;

    let summary = RunSummary {
        input_rows: input.len(),
        not_null_rows: partitions.not_null.len(),
        null_rows: partitions.null.len(),
        outcomes: count_outcomes(&verified.table, config)?,
        overridden: verified.overridden,
        join: verified.join,
    };

    Ok(RunReport {
        meta: RunMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        table: verified.table,
    })
}
