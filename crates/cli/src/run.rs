// Run and paths commands

use std::fs;

use serde::Serialize;
use skucheck_config::{JobConfig, ResolvedPaths};
use skucheck_io::{load_inputs, FileStages};
use skucheck_recon::{Outcome, RunReport};

use crate::exit_codes::{EXIT_ERROR, EXIT_OUTPUT};
use crate::{CliError, JobArgs};

/// `--json` payload: run metadata and summary plus where everything went.
#[derive(Serialize)]
struct RunJson<'a> {
    #[serde(flatten)]
    report: &'a RunReport,
    paths: &'a ResolvedPaths,
}

fn load_job(args: &JobArgs) -> Result<(JobConfig, ResolvedPaths), CliError> {
    let config = match &args.config {
        Some(path) => JobConfig::load(path),
        None => JobConfig::load_default(),
    }
    .map_err(|e| {
        let err = CliError::from(e);
        match &args.config {
            Some(_) => err,
            None => err.with_hint(format!("config file: {}", JobConfig::default_path().display())),
        }
    })?;

    let paths = config.resolve(args.base_dir.as_deref())?;
    Ok((config, paths))
}

pub fn cmd_run(args: JobArgs, json: bool) -> Result<(), CliError> {
    let (config, paths) = load_job(&args)?;
    tracing::debug!(base_dir = %paths.base_dir.display(), "paths resolved");

    fs::create_dir_all(&paths.output_dir).map_err(|e| {
        CliError::new(
            EXIT_OUTPUT,
            format!("cannot create {}: {e}", paths.output_dir.display()),
        )
    })?;

    let inputs = load_inputs(&paths.receipts, &paths.partners)?;

    let mut stages = FileStages {
        not_null_out: paths.not_null_out.clone(),
        null_out: paths.null_out.clone(),
        reference: paths.catalogue.clone(),
        reference_sheet: paths.catalogue_sheet.clone(),
        report_out: paths.report_out.clone(),
    };
    let report = skucheck_recon::run(&inputs.receipts, &mut stages, &config.verify)?;

    let summary = &report.summary;
    let outcomes = Outcome::ALL
        .iter()
        .map(|o| format!("{}={}", o.code(), summary.outcomes.get(*o)))
        .collect::<Vec<_>>()
        .join(" ");
    eprintln!(
        "{} rows ({} with response, {} without), {} partner receipts: {} ({} overridden)",
        summary.input_rows,
        summary.not_null_rows,
        summary.null_rows,
        inputs.partners.len(),
        outcomes,
        summary.overridden,
    );
    eprintln!("report: {}", paths.report_out.display());

    if json {
        let payload = RunJson { report: &report, paths: &paths };
        let out = serde_json::to_string_pretty(&payload)
            .map_err(|e| CliError::new(EXIT_ERROR, format!("cannot encode summary: {e}")))?;
        println!("{}", out);
    }

    Ok(())
}

pub fn cmd_paths(args: JobArgs) -> Result<(), CliError> {
    let (_, paths) = load_job(&args)?;

    let rows = [
        ("base_dir", paths.base_dir.display().to_string()),
        ("receipts", paths.receipts.display().to_string()),
        ("partners", paths.partners.display().to_string()),
        ("catalogue", paths.catalogue.display().to_string()),
        ("catalogue_sheet", paths.catalogue_sheet.clone().unwrap_or_else(|| "(first)".into())),
        ("not_null", paths.not_null_out.display().to_string()),
        ("null", paths.null_out.display().to_string()),
        ("report", paths.report_out.display().to_string()),
    ];
    for (label, value) in rows {
        println!("{:<16} {}", label, value);
    }
    Ok(())
}
