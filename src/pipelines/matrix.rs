use std::collections::HashMap;
use std::fs;

use indicatif::ProgressBar;

use crate::helper::blast_helper::{BlastnCommand, DbSource, parse_report};
use crate::helper::entrez::{EntrezClient, accession_of};
use crate::helper::layout::temp_path;
use crate::helper::matrix::assemble;
use crate::helper::{PipelineError, ProjectLayout, RunLogger, StageReport, sample_name};

/// Per raw file: run BLAST against the shared local database (installing it
/// on first use), scrape the report for each query's best hit, look up the
/// hit taxonomy remotely and persist the joined data matrix. A sample whose
/// matrix already exists is never touched again.
pub fn matrix_all(root: &str, source: &str, entrez_email: &str) -> Result<StageReport, PipelineError> {
    let db = DbSource::from_name(source)?;

    let layout = ProjectLayout::new(root);
    layout.require_dir(&layout.raw_data_dir(), PipelineError::InputDirNotFound)?;
    fs::create_dir_all(layout.blast_results_dir())?;
    fs::create_dir_all(layout.matrices_dir())?;
    fs::create_dir_all(layout.reports_dir())?;

    let mut logger = RunLogger::open(&layout.run_log_path())?;
    logger.line("Starting matrix stage")?;
    logger.line(&format!("Database source: {}", db.db_name()))?;

    // Shared precondition for every sample in the run.
    if db.ensure_installed(&layout.blast_dir())? {
        logger.note(&format!("Installed the {} BLAST database.", db.db_name()))?;
    } else {
        logger.line(&format!(
            "BLAST database {} already present.",
            db.db_name()
        ))?;
    }

    let entrez = EntrezClient::new(entrez_email);
    let mut report = StageReport::new("matrix");
    let inputs = layout.raw_sequence_files()?;
    let bar = ProgressBar::new(inputs.len() as u64);

    for input in &inputs {
        let sample = sample_name(input);
        let matrix_path = layout.matrix_path(&sample);

        if matrix_path.exists() {
            logger.note(&format!(
                "Matrix for '{}' already exists. Skipping.",
                sample
            ))?;
            report.mark_skipped(&sample);
            bar.inc(1);
            continue;
        }

        let results_path = layout.blast_result_path(&sample);
        if results_path.exists() {
            logger.note(&format!(
                "BLAST results for '{}' found. Skipping BLAST.",
                sample
            ))?;
        } else {
            logger.note(&format!("Running BLAST for {}...", sample))?;
            let tmp_out = temp_path(&results_path);
            let run = BlastnCommand::new(input, &db.db_path(&layout.blast_dir()), &tmp_out).run();
            match run {
                Ok(output) if output.status.success() => {
                    if let Err(e) = fs::rename(&tmp_out, &results_path) {
                        logger.warn(&format!(
                            "Error finalizing BLAST results for {}: {}",
                            sample, e
                        ))?;
                    }
                }
                Ok(output) => {
                    let _ = fs::remove_file(&tmp_out);
                    logger.warn(&format!(
                        "BLAST error for {}:\n{}",
                        sample,
                        String::from_utf8_lossy(&output.stderr)
                    ))?;
                }
                Err(e) => {
                    let _ = fs::remove_file(&tmp_out);
                    logger.warn(&format!("Error invoking blastn for {}: {}", sample, e))?;
                }
            }
        }

        // A failed search leaves no results file; the sample is retried on
        // the next run.
        if !results_path.exists() {
            report.mark_failed(&sample);
            bar.inc(1);
            continue;
        }

        let result = process_sample(&layout, &entrez, &sample, &mut logger);
        match result {
            Ok(rows) => {
                logger.note(&format!(
                    "Saved matrix to '{}' ({} rows)",
                    matrix_path.display(),
                    rows
                ))?;
                report.mark_processed(&sample);
            }
            Err(e) => {
                logger.warn(&format!("Error building matrix for {}: {}", sample, e))?;
                report.mark_failed(&sample);
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    report.finish();
    report.write_json(&layout.stage_report_path("matrix"))?;
    logger.note(&report.summary_line())?;
    Ok(report)
}

fn process_sample(
    layout: &ProjectLayout,
    entrez: &EntrezClient,
    sample: &str,
    logger: &mut RunLogger,
) -> Result<usize, PipelineError> {
    let text = fs::read_to_string(layout.blast_result_path(sample))?;
    let hits = parse_report(&text);

    logger.note(&format!("Fetching taxonomy for {}...", sample))?;
    let mut taxonomies: HashMap<String, Vec<String>> = HashMap::new();
    for hit in &hits {
        let accession = accession_of(&hit.description);
        let lineage = entrez.taxonomy_or_placeholder(accession);
        if lineage == [crate::helper::entrez::NOT_FOUND_TAXON] {
            logger.warn(&format!(
                "Could not fetch taxonomy for {} (Query: {})",
                accession, hit.query_id
            ))?;
        }
        taxonomies.insert(hit.query_id.clone(), lineage);
    }

    let matrix = assemble(&hits, &taxonomies);
    let bytes = matrix.to_tsv_bytes()?;
    layout.atomic_write(&layout.matrix_path(sample), &bytes)?;
    Ok(matrix.len())
}
